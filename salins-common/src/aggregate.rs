//! Per-department aggregation for chart data
//!
//! Pure function of the current record set; recomputed on every change and
//! never fed back into the records.

use crate::record::{CompensationRecord, DepartmentAggregate};

/// Sum `total_compensation` per distinct department value
///
/// The grouping key is the literal department string, case-sensitive, with
/// no normalization. Output order is the insertion order of each
/// department's first appearance in the record sequence. Empty input yields
/// an empty set.
pub fn department_totals(records: &[CompensationRecord]) -> Vec<DepartmentAggregate> {
    let mut totals: Vec<DepartmentAggregate> = Vec::new();

    for record in records {
        match totals
            .iter_mut()
            .find(|aggregate| aggregate.department == record.department)
        {
            Some(aggregate) => aggregate.total_compensation += record.total_compensation,
            None => totals.push(DepartmentAggregate {
                department: record.department.clone(),
                total_compensation: record.total_compensation,
            }),
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(department: &str, base: f64) -> CompensationRecord {
        CompensationRecord::new(
            format!("E{}", base),
            "Test".to_string(),
            department.to_string(),
            "Jan".to_string(),
            base,
            0.0,
            0.0,
        )
    }

    #[test]
    fn sums_totals_per_department() {
        let records = vec![
            record("Eng", 1150.0),
            record("Eng", 2000.0),
            record("Sales", 500.0),
        ];

        let totals = department_totals(&records);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].department, "Eng");
        assert_eq!(totals[0].total_compensation, 3150.0);
        assert_eq!(totals[1].department, "Sales");
        assert_eq!(totals[1].total_compensation, 500.0);
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let records = vec![record("Eng", 100.0), record("eng", 200.0)];
        let totals = department_totals(&records);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn preserves_first_appearance_order() {
        let records = vec![
            record("Sales", 1.0),
            record("Eng", 2.0),
            record("Sales", 3.0),
            record("HR", 4.0),
        ];
        let totals = department_totals(&records);
        let departments: Vec<&str> = totals.iter().map(|a| a.department.as_str()).collect();
        assert_eq!(departments, vec!["Sales", "Eng", "HR"]);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        assert!(department_totals(&[]).is_empty());
    }
}
