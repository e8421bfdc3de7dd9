// "Load more" cursor into the filtered result list

pub const DEFAULT_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    cursor: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            cursor: page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    // Called whenever the category or tag scope changes
    pub fn reset(&mut self) {
        self.cursor = self.page_size;
    }

    // Shows one more page, never running past what `total` can fill.
    pub fn load_more(&mut self, total: usize) {
        let ceiling = total.max(self.page_size);
        self.cursor = (self.cursor + self.page_size).min(ceiling);
    }

    pub fn visible(&self, total: usize) -> usize {
        self.cursor.min(total)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.cursor < total
    }

    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible(items.len())]
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
