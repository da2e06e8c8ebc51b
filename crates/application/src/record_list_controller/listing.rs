use super::*;

use crate::RecordPage;

impl RecordListController {
    /// Returns the filtered, sorted view of the collection.
    ///
    /// Search, then predicates, then a stable sort. The returned borrows point
    /// into the stored collection, so repeated calls without a mutation in
    /// between yield the same records in the same order.
    #[must_use]
    pub fn visible_records(&self) -> Vec<&Record> {
        let searchable = self.settings.searchable_fields();
        let mut visible: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| self.filter.matches(record, searchable))
            .collect();

        let sort = self.settings.sort();
        visible.sort_by(|left, right| sort.compare(left, right));
        visible
    }

    /// Returns one page of [`Self::visible_records`].
    ///
    /// A page past the end is empty rather than an error.
    pub fn paginate(&self, page_number: usize, page_size: usize) -> AppResult<RecordPage<'_>> {
        if page_number < 1 {
            return Err(AppError::InvalidArgument(format!(
                "page number must be at least 1, got {page_number}"
            )));
        }

        if page_size < 1 {
            return Err(AppError::InvalidArgument(format!(
                "page size must be at least 1, got {page_size}"
            )));
        }

        let visible = self.visible_records();
        let total_count = visible.len();
        let offset = (page_number - 1).saturating_mul(page_size);

        Ok(RecordPage {
            items: visible.into_iter().skip(offset).take(page_size).collect(),
            total_count,
            total_pages: total_count.div_ceil(page_size),
            page_number,
            page_size,
        })
    }
}
