use std::fmt;
use std::str::FromStr;

use crate::errors::ServiceError;

/// Number sequence kinds served by the upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Primes,
    Fibonacci,
    Even,
    Random,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Primes,
        Category::Fibonacci,
        Category::Even,
        Category::Random,
    ];

    /// Key used in `/numbers/{id}`
    pub fn key(&self) -> &'static str {
        match self {
            Category::Primes => "p",
            Category::Fibonacci => "f",
            Category::Even => "e",
            Category::Random => "r",
        }
    }

    /// Upstream resource path, relative to the base url
    pub fn path(&self) -> &'static str {
        match self {
            Category::Primes => "/primes",
            Category::Fibonacci => "/fibo",
            Category::Even => "/even",
            Category::Random => "/random",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Primes => "primes",
            Category::Fibonacci => "Fibonacci",
            Category::Even => "even",
            Category::Random => "random",
        }
    }

    /// `"p (primes)"` style hint used by the index route
    pub fn usage_hint(&self) -> String {
        format!("{} ({})", self.key(), self.label())
    }
}

impl FromStr for Category {
    type Err = ServiceError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.key() == id)
            .ok_or_else(|| ServiceError::InvalidCategory(id.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
