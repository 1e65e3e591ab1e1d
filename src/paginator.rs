pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: usize,
    page_count: u32,
}

impl<'a, T> Paginator<'a, T> {
    pub fn from(items: &'a [T], page_size: u32) -> Self {
        let page_size = page_size.max(1) as usize;
        let page_count = items.len().div_ceil(page_size) as u32;

        Paginator {
            items,
            page_size,
            page_count,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Clamps a requested page into the valid range; out of range pages show the first one.
    pub fn sanitize_page(&self, page: u32) -> u32 {
        match page {
            0 => 1,
            x if x > self.page_count => 1,
            x => x,
        }
    }

    /// Items of a 1-based page. An empty list has a single empty first page.
    pub fn get_page(&self, page: u32) -> Result<&'a [T], String> {
        if page == 0 {
            return Err("Page has to be greater than 0".to_string());
        }
        if self.items.is_empty() && page == 1 {
            return Ok(self.items);
        }
        if page > self.page_count {
            return Err(format!("Page has to be less than page_count ({})", self.page_count));
        }

        let start = (page as usize - 1) * self.page_size;
        let end = (start + self.page_size).min(self.items.len());
        Ok(&self.items[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_case() {
        let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
        let paginator = Paginator::from(&items, 3);
        assert_eq!(paginator.page_count(), 5);
        assert_eq!(paginator.get_page(1), Ok([1, 2, 3].as_slice()));
        assert_eq!(paginator.get_page(4), Ok([10, 11, 12].as_slice()));
        assert_eq!(paginator.get_page(5), Ok([13].as_slice()));

        assert_eq!(paginator.get_page(0), Err("Page has to be greater than 0".to_string()));
        assert_eq!(paginator.get_page(6), Err("Page has to be less than page_count (5)".to_string()));
    }

    #[test]
    fn test_sanitize_page() {
        let items = vec![1, 2, 3, 4];
        let paginator = Paginator::from(&items, 2);
        assert_eq!(paginator.sanitize_page(0), 1);
        assert_eq!(paginator.sanitize_page(2), 2);
        assert_eq!(paginator.sanitize_page(3), 1);
    }

    #[test]
    fn test_empty() {
        let items: Vec<u32> = vec![];
        let paginator = Paginator::from(&items, 3);
        assert_eq!(paginator.page_count(), 0);
        assert_eq!(paginator.get_page(1), Ok([].as_slice()));
        assert_eq!(paginator.get_page(2), Err("Page has to be less than page_count (0)".to_string()));
    }
}
