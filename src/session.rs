// 🧠 Session Context - state threaded through the chat loop

/// What the chat remembers from one question to the next
///
/// Only the last resolved company survives a question. The interpreter
/// takes this by value and hands back the updated copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContext {
    company: Option<String>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Context after `company` was resolved
    pub fn remember(self, company: impl Into<String>) -> Self {
        QueryContext {
            company: Some(company.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_empty() {
        assert_eq!(QueryContext::new().company(), None);
    }

    #[test]
    fn test_remember_replaces_company() {
        let context = QueryContext::new().remember("Tesla").remember("Apple");
        assert_eq!(context.company(), Some("Apple"));
    }
}
