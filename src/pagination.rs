use serde::{Deserialize, Serialize};

const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    /// Returns `(page, per_page, offset)` with defaults applied and bounds clamped.
    pub fn normalize(&self) -> (u64, u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        // Stores bind OFFSET as a signed 64-bit integer.
        let offset = (page - 1).saturating_mul(per_page).min(MAX_OFFSET);
        (page, per_page, offset)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Meta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl Meta {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_twenty() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
    }

    #[test]
    fn clamps_page_and_size() {
        assert_eq!(Pagination::new(0, 0).normalize(), (1, 1, 0));
        assert_eq!(Pagination::new(3, 500).normalize(), (3, 100, 200));
    }

    #[test]
    fn huge_page_caps_offset() {
        assert_eq!(
            Pagination::new(u64::MAX, 100).normalize(),
            (u64::MAX, 100, i64::MAX as u64)
        );
    }
}
