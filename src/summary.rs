//! Headline metrics for the dashboard's overview panel

use crate::error::{PulseError, Result};
use crate::value::ValueModel;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Engagement categories in ascending order of activity intensity.
pub const ENGAGEMENT_ORDER: [&str; 3] = ["Low", "Medium", "High"];

/// Scalar metrics shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_players: usize,
    pub avg_playtime_hours: f64,
    pub high_engagement_players: usize,
    /// Share of players with at least one purchase, in percent
    pub purchase_rate_pct: f64,
    pub avg_estimated_value: f64,
}

/// Compute the overview metrics for a filtered table.
pub fn overview(df: &DataFrame, value: &ValueModel) -> Result<OverviewStats> {
    let total_players = df.height();
    if total_players == 0 {
        return Err(PulseError::EmptyInput);
    }

    let playtime = df
        .column("PlayTimeHours")
        .map_err(|_| PulseError::FeatureNotFound("PlayTimeHours".to_string()))?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| PulseError::Data(e.to_string()))?;
    let avg_playtime_hours = playtime
        .f64()
        .map_err(|e| PulseError::Data(e.to_string()))?
        .mean()
        .unwrap_or(0.0);

    let engagement = engagement_values(df)?;
    let high_engagement_players = engagement.iter().filter(|v| v.as_deref() == Some("High")).count();

    let purchases = df
        .column("InGamePurchases")
        .map_err(|_| PulseError::FeatureNotFound("InGamePurchases".to_string()))?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| PulseError::Data(e.to_string()))?;
    let buyers = purchases
        .f64()
        .map_err(|e| PulseError::Data(e.to_string()))?
        .into_iter()
        .filter(|v| matches!(v, Some(p) if *p >= 1.0))
        .count();
    let purchase_rate_pct = buyers as f64 / total_players as f64 * 100.0;

    let scores = value.score(df)?;
    let avg_estimated_value = scores.iter().sum::<f64>() / total_players as f64;

    Ok(OverviewStats {
        total_players,
        avg_playtime_hours,
        high_engagement_players,
        purchase_rate_pct,
        avg_estimated_value,
    })
}

/// Purchase rate (percent) per engagement level, in Low/Medium/High order.
///
/// Levels with no players report a rate of 0.
pub fn purchase_rate_by_engagement(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    if df.height() == 0 {
        return Err(PulseError::EmptyInput);
    }

    let engagement = engagement_values(df)?;
    let purchases = df
        .column("InGamePurchases")
        .map_err(|_| PulseError::FeatureNotFound("InGamePurchases".to_string()))?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| PulseError::Data(e.to_string()))?;
    let purchases = purchases.f64().map_err(|e| PulseError::Data(e.to_string()))?;

    let mut out = Vec::with_capacity(ENGAGEMENT_ORDER.len());
    for level in ENGAGEMENT_ORDER {
        let mut members = 0usize;
        let mut buyers = 0usize;
        for (value, purchase) in engagement.iter().zip(purchases.into_iter()) {
            if value.as_deref() == Some(level) {
                members += 1;
                if matches!(purchase, Some(p) if p >= 1.0) {
                    buyers += 1;
                }
            }
        }
        let rate = if members > 0 {
            buyers as f64 / members as f64 * 100.0
        } else {
            0.0
        };
        out.push((level.to_string(), rate));
    }

    Ok(out)
}

fn engagement_values(df: &DataFrame) -> Result<Vec<Option<String>>> {
    let series = df
        .column("EngagementLevel")
        .map_err(|_| PulseError::FeatureNotFound("EngagementLevel".to_string()))?
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(|e| PulseError::Data(e.to_string()))?;
    let ca = series.str().map_err(|e| PulseError::Data(e.to_string()))?;
    Ok(ca.into_iter().map(|v| v.map(|s| s.to_string())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "EngagementLevel" => &["Low", "High", "Medium", "High"],
            "PlayTimeHours" => &[2.0, 10.0, 6.0, 22.0],
            "InGamePurchases" => &[0.0, 1.0, 0.0, 1.0],
            "PlayerLevel" => &[3.0, 40.0, 15.0, 60.0],
        )
        .unwrap()
    }

    #[test]
    fn test_overview() {
        let stats = overview(&sample_df(), &ValueModel::default()).unwrap();
        assert_eq!(stats.total_players, 4);
        assert!((stats.avg_playtime_hours - 10.0).abs() < 1e-9);
        assert_eq!(stats.high_engagement_players, 2);
        assert!((stats.purchase_rate_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_overview_empty_input() {
        let empty = sample_df().head(Some(0));
        assert!(matches!(
            overview(&empty, &ValueModel::default()),
            Err(PulseError::EmptyInput)
        ));
    }

    #[test]
    fn test_purchase_rate_breakdown_order() {
        let rates = purchase_rate_by_engagement(&sample_df()).unwrap();
        let levels: Vec<&str> = rates.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(levels, vec!["Low", "Medium", "High"]);

        assert_eq!(rates[0].1, 0.0); // Low: no buyers
        assert_eq!(rates[2].1, 100.0); // High: all buyers
    }
}
