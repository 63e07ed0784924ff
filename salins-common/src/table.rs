//! Sort/paginate view model for the employee table
//!
//! A stateful but side-effect-free projection of a record set into a sorted,
//! paged view. The underlying records are never mutated; sorting and
//! pagination are read-only.

use crate::record::CompensationRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default number of rows per table page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sortable record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    EmployeeId,
    Name,
    Department,
    Period,
    BaseSalary,
    Bonus,
    Deductions,
    TotalCompensation,
    PredictedCompensation,
    AnomalyLabel,
}

/// Sort direction; defaults to ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sorted, paginated projection over an owned record set
#[derive(Debug, Clone)]
pub struct TableView {
    records: Vec<CompensationRecord>,
    sort: Option<SortField>,
    direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl TableView {
    /// Wrap a record set with default page size, no sort, page 1
    pub fn new(records: Vec<CompensationRecord>) -> Self {
        Self::with_page_size(records, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(records: Vec<CompensationRecord>, page_size: usize) -> Self {
        Self {
            records,
            sort: None,
            direction: SortDirection::Ascending,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn records(&self) -> &[CompensationRecord] {
        &self.records
    }

    pub fn sort(&self) -> Option<SortField> {
        self.sort
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages, at least 1 even for an empty record set
    pub fn total_pages(&self) -> usize {
        self.records.len().div_ceil(self.page_size).max(1)
    }

    /// Request a sort on `field`
    ///
    /// Repeated requests on the current field toggle ascending and
    /// descending; there is no third "unsorted" state reachable this way.
    /// A different field starts over ascending. The current page is left
    /// alone: sorting does not change the record count, so the page cannot
    /// fall out of range.
    pub fn set_sort(&mut self, field: SortField) {
        if self.sort == Some(field) {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.sort = Some(field);
            self.direction = SortDirection::Ascending;
        }
    }

    /// Move to page `page`, clamped to `[1, total_pages]`
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    /// The current page of the full sort order
    ///
    /// Pure projection: computes a sorted index over the records and returns
    /// references into the unmodified set. The sort is stable, so equal keys
    /// keep their input order.
    pub fn view(&self) -> Vec<&CompensationRecord> {
        let mut order: Vec<&CompensationRecord> = self.records.iter().collect();
        if let Some(field) = self.sort {
            order.sort_by(|a, b| {
                let ordering = compare(a, b, field);
                match self.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let start = (self.page - 1) * self.page_size;
        order
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }
}

/// Field comparator
///
/// Strings compare lexicographically, numbers by value. When either side of
/// an optional field is absent the pair compares equal; absent values are
/// not pinned to either end. That is a weak tie-break, kept as observed.
fn compare(a: &CompensationRecord, b: &CompensationRecord, field: SortField) -> Ordering {
    match field {
        SortField::EmployeeId => a.employee_id.cmp(&b.employee_id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Department => a.department.cmp(&b.department),
        SortField::Period => a.period.cmp(&b.period),
        SortField::BaseSalary => a.base_salary.total_cmp(&b.base_salary),
        SortField::Bonus => a.bonus.total_cmp(&b.bonus),
        SortField::Deductions => a.deductions.total_cmp(&b.deductions),
        SortField::TotalCompensation => a.total_compensation.total_cmp(&b.total_compensation),
        SortField::PredictedCompensation => {
            match (a.predicted_compensation, b.predicted_compensation) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            }
        }
        SortField::AnomalyLabel => match (a.anomaly_label, b.anomaly_label) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, base: f64) -> CompensationRecord {
        CompensationRecord::new(
            id.to_string(),
            name.to_string(),
            "Eng".to_string(),
            "Jan".to_string(),
            base,
            0.0,
            0.0,
        )
    }

    fn batch(count: usize) -> Vec<CompensationRecord> {
        (0..count)
            .map(|i| record(&format!("E{:02}", i), &format!("N{:02}", i), i as f64))
            .collect()
    }

    #[test]
    fn total_pages_is_ceiling_of_count_over_page_size() {
        let table = TableView::new(batch(25));
        assert_eq!(table.total_pages(), 3);

        let table = TableView::new(batch(30));
        assert_eq!(table.total_pages(), 3);

        let table = TableView::new(batch(0));
        assert_eq!(table.total_pages(), 1);
    }

    #[test]
    fn set_page_clamps_into_range() {
        let mut table = TableView::new(batch(25));

        table.set_page(4);
        assert_eq!(table.page(), 3);

        table.set_page(0);
        assert_eq!(table.page(), 1);

        table.set_page(2);
        assert_eq!(table.page(), 2);
    }

    #[test]
    fn view_returns_page_size_bounded_slice() {
        let mut table = TableView::new(batch(25));
        assert_eq!(table.view().len(), 10);

        table.set_page(3);
        assert_eq!(table.view().len(), 5);
    }

    #[test]
    fn sort_toggle_is_two_state() {
        let mut table = TableView::new(vec![
            record("E1", "Carol", 1.0),
            record("E2", "Alice", 2.0),
            record("E3", "Bob", 3.0),
        ]);

        table.set_sort(SortField::Name);
        let names: Vec<&str> = table.view().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

        table.set_sort(SortField::Name);
        let names: Vec<&str> = table.view().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Bob", "Alice"]);

        // Third click returns to ascending, never an unsorted state
        table.set_sort(SortField::Name);
        assert_eq!(table.direction(), SortDirection::Ascending);
        let names: Vec<&str> = table.view().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn switching_sort_field_starts_ascending() {
        let mut table = TableView::new(batch(5));
        table.set_sort(SortField::Name);
        table.set_sort(SortField::Name);
        assert_eq!(table.direction(), SortDirection::Descending);

        table.set_sort(SortField::BaseSalary);
        assert_eq!(table.sort(), Some(SortField::BaseSalary));
        assert_eq!(table.direction(), SortDirection::Ascending);
    }

    #[test]
    fn sorting_does_not_reset_the_page() {
        let mut table = TableView::new(batch(25));
        table.set_page(3);
        table.set_sort(SortField::BaseSalary);
        assert_eq!(table.page(), 3);
    }

    #[test]
    fn numeric_sort_compares_by_value() {
        let mut table = TableView::new(vec![
            record("E1", "A", 200.0),
            record("E2", "B", 30.0),
            record("E3", "C", 1000.0),
        ]);
        table.set_sort(SortField::BaseSalary);
        let bases: Vec<f64> = table.view().iter().map(|r| r.base_salary).collect();
        assert_eq!(bases, vec![30.0, 200.0, 1000.0]);
    }

    #[test]
    fn absent_optionals_compare_equal_and_keep_input_order() {
        let mut with_prediction = record("E2", "B", 2.0);
        with_prediction.predicted_compensation = Some(500.0);
        let records = vec![record("E1", "A", 1.0), with_prediction, record("E3", "C", 3.0)];

        let mut table = TableView::new(records);
        table.set_sort(SortField::PredictedCompensation);
        // Stable sort plus equal comparisons leaves the order untouched
        let ids: Vec<&str> = table.view().iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E2", "E3"]);
    }

    #[test]
    fn view_does_not_mutate_the_record_set() {
        let records = batch(5);
        let mut table = TableView::new(records.clone());
        table.set_sort(SortField::BaseSalary);
        table.set_sort(SortField::BaseSalary);
        let _ = table.view();
        assert_eq!(table.records(), records.as_slice());
    }
}
