//! Row types deserialized from the result CSV files.

use crate::types::SolverStatus;
use serde::{Deserialize, Deserializer};

/// One experiment run. Every metric column is optional: tables written
/// by different campaign stages carry different subsets, and absent or
/// unparsable cells must drop the row from the affected chart only,
/// never fail the load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperimentRecord {
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub solver_status: SolverStatus,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub runtime_sec: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_emissions: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_cost_with_tax: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_cost_without_tax: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub buffer_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tax_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cap_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub baseline_emissions: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub emission_reduction_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub service_time_promised: Option<f64>,
    #[serde(default, rename = "DIO", deserialize_with = "lenient_f64")]
    pub dio: Option<f64>,
    #[serde(default, rename = "DIO_improvement_pct", deserialize_with = "lenient_f64")]
    pub dio_improvement_pct: Option<f64>,
}

/// One point on a pareto front file. The objective column depends on
/// the front family; both are kept optional so one file layout covers
/// every family.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParetoPoint {
    #[serde(default, rename = "Cost", deserialize_with = "lenient_f64")]
    pub cost: Option<f64>,
    #[serde(default, rename = "Emissions", deserialize_with = "lenient_f64")]
    pub emissions: Option<f64>,
    #[serde(default, rename = "DIO", deserialize_with = "lenient_f64")]
    pub dio: Option<f64>,
}

/// Accepts a number, an empty cell, or garbage; only a finite number
/// parses. The float spellings `nan` and `inf` count as garbage, so a
/// non-finite value can never reach the chart statistics.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.trim().parse().ok())
        .filter(|f: &f64| f.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(csv: &str) -> ExperimentRecord {
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        reader
            .deserialize()
            .next()
            .expect("one row")
            .expect("row parses")
    }

    #[test]
    fn missing_columns_deserialize_to_none() {
        let rec = parse_one("instance_id,solver_status\nbom_10,OPTIMAL\n");
        assert_eq!(rec.instance_id, "bom_10");
        assert_eq!(rec.solver_status, SolverStatus::Optimal);
        assert!(rec.runtime_sec.is_none());
        assert!(rec.strategy.is_none());
    }

    #[test]
    fn empty_and_garbage_cells_deserialize_to_none() {
        let rec = parse_one(
            "instance_id,solver_status,runtime_sec,total_emissions,buffer_count\n\
             bom_10,OPTIMAL,,N/A,12\n",
        );
        assert!(rec.runtime_sec.is_none(), "empty cell must be None");
        assert!(rec.total_emissions.is_none(), "garbage cell must be None");
        assert_eq!(rec.buffer_count, Some(12.0));
    }

    #[test]
    fn non_finite_spellings_deserialize_to_none() {
        // `str::parse::<f64>` would happily produce NaN or infinity
        // from these; as cell values they mean "absent".
        let rec = parse_one(
            "instance_id,solver_status,total_emissions,total_cost_with_tax,buffer_count\n\
             m1,OPTIMAL,nan,inf,NaN\n",
        );
        assert!(rec.total_emissions.is_none(), "nan cell must be None");
        assert!(rec.total_cost_with_tax.is_none(), "inf cell must be None");
        assert!(rec.buffer_count.is_none(), "NaN cell must be None");
    }

    #[test]
    fn dio_columns_use_their_published_headers() {
        let rec = parse_one(
            "instance_id,solver_status,DIO,DIO_improvement_pct\n\
             m1,OPTIMAL,45.5,-3.2\n",
        );
        assert_eq!(rec.dio, Some(45.5));
        assert_eq!(rec.dio_improvement_pct, Some(-3.2));
    }

    #[test]
    fn unknown_status_becomes_other() {
        let rec = parse_one("instance_id,solver_status\nbom_10,TIMEOUT\n");
        assert_eq!(rec.solver_status, SolverStatus::Other);
    }
}
