/// Client-side pagination over an already filtered list. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub page: usize,
    pub per_page: usize,
}

impl Paginator {
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.per_page)
    }

    /// Back to page 1 when `len` items no longer reach the current page.
    pub fn clamp(&mut self, len: usize) {
        if self.page > self.total_pages(len) {
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        let start = (self.page - 1).saturating_mul(self.per_page).min(len);
        let end = start.saturating_add(self.per_page).min(len);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_and_counts() {
        let items: Vec<u32> = (0..13).collect();
        let mut p = Paginator::new(6);
        assert_eq!(p.total_pages(items.len()), 3);
        p.set_page(3);
        assert_eq!(p.slice(&items), &[12]);
        p.set_page(0);
        assert_eq!(p.page, 1);
        assert_eq!(p.slice(&items).len(), 6);
    }

    #[test]
    fn shrinking_list_resets_to_first_page() {
        let mut p = Paginator::new(5);
        p.set_page(3);
        p.clamp(12);
        assert_eq!(p.page, 3);
        p.clamp(4);
        assert_eq!(p.page, 1);
        p.clamp(0);
        assert_eq!(p.page, 1);
        assert!(p.slice::<u8>(&[]).is_empty());
    }
}
