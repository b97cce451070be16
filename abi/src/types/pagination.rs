use serde::{Deserialize, Serialize};

use crate::{Error, Normalizer, Validator};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// offset based paging, as the list endpoints take it from the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

impl Validator for Pagination {
    fn validate(&self) -> Result<(), Error> {
        if self.limit < 1 || self.limit > MAX_PAGE_SIZE {
            return Err(Error::InvalidPageSize(self.limit));
        }
        if self.skip < 0 {
            return Err(Error::InvalidSkip(self.skip));
        }
        Ok(())
    }
}

impl Normalizer for Pagination {
    fn do_normalize(&mut self) {
        if self.limit == 0 {
            self.limit = DEFAULT_PAGE_SIZE;
        }
    }
}
