use std::fmt;

use crate::constants::{DASHBOARD_CACHE_KEY, MOVIES_CACHE_KEY, MY_LIST_CACHE_KEY};

/// Type-safe keys for the client-side cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Movies behind the dashboard rows
    DashboardMovies,
    /// Full catalog for the movies page
    AllMovies,
    /// Ids on the user's list
    MyList,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::DashboardMovies => DASHBOARD_CACHE_KEY,
            CacheKey::AllMovies => MOVIES_CACHE_KEY,
            CacheKey::MyList => MY_LIST_CACHE_KEY,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
