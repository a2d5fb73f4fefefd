use crate::models::Query;

/// Number of songs shown per page
pub const PAGE_SIZE: usize = 6;

/// Outcome of asking for more results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The cursor moved forward by one page
    Moved { cursor: usize },
    /// The cursor was already past the end; nothing changed
    Exhausted,
}

/// Pagination state for one user's recommendation feed
///
/// Remembers the last query it evaluated. A different query (any field,
/// any feature component) sends the cursor back to the first page; repeating
/// the same query leaves it where it is. Only [`advance`](Self::advance)
/// moves the cursor forward.
#[derive(Debug, Clone)]
pub struct RecommendationSession {
    previous_query: Option<Query>,
    cursor: usize,
    page_size: usize,
}

impl Default for RecommendationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationSession {
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            previous_query: None,
            cursor: 0,
            page_size,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn previous_query(&self) -> Option<&Query> {
        self.previous_query.as_ref()
    }

    /// Records `query` as the active one, resetting the cursor if it changed
    ///
    /// Returns true when the cursor was reset.
    pub fn observe(&mut self, query: &Query) -> bool {
        match &self.previous_query {
            Some(previous) if previous == query => false,
            Some(_) => {
                tracing::debug!(from_cursor = self.cursor, "Query changed, resetting cursor");
                self.cursor = 0;
                self.previous_query = Some(query.clone());
                true
            }
            None => {
                self.previous_query = Some(query.clone());
                false
            }
        }
    }

    /// Moves to the next page while the cursor is inside the result list
    pub fn advance(&mut self, total_results: usize) -> Advance {
        if self.cursor < total_results {
            self.cursor += self.page_size;
            Advance::Moved {
                cursor: self.cursor,
            }
        } else {
            Advance::Exhausted
        }
    }

    /// Whether the cursor has run past the end of the results
    pub fn is_exhausted(&self, total_results: usize) -> bool {
        self.cursor >= total_results
    }

    /// Slice of `ranked` starting at the cursor, at most one page long
    pub fn current_page<'r, T>(&self, ranked: &'r [T]) -> &'r [T] {
        if self.cursor >= ranked.len() {
            return &[];
        }
        let end = (self.cursor + self.page_size).min(ranked.len());
        &ranked[self.cursor..end]
    }
}
