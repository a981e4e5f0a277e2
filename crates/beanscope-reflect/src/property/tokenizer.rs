//! Property path grammar: `seg1[idx1].seg2[idx2]. … .segN`.

use std::iter::FusedIterator;

/// One segment of a property path together with the unparsed remainder.
///
/// For `orders[0].items` the first step is `name = "orders"`, `indexed_name = "orders[0]"`,
/// `index = Some("0")` and `children = Some("items")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    name: String,
    indexed_name: String,
    index: Option<String>,
    children: Option<String>,
}

impl PathStep {
    pub fn parse(path: &str) -> Self {
        let (segment, children) = match path.split_once('.') {
            Some((segment, rest)) => (segment, Some(rest.to_string())),
            None => (path, None),
        };

        let (name, index) = match segment.split_once('[') {
            Some((name, rest)) => {
                // Without a closing bracket the rest of the segment is the index.
                let index = match rest.rfind(']') {
                    Some(end) => &rest[..end],
                    None => rest,
                };
                (name, Some(index.to_string()))
            }
            None => (segment, None),
        };

        Self {
            name: name.to_string(),
            indexed_name: segment.to_string(),
            index,
            children,
        }
    }

    /// Segment name without the index.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The whole segment, brackets included.
    pub fn indexed_name(&self) -> &str {
        &self.indexed_name
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// Remainder of the path after this segment's `.`.
    pub fn children(&self) -> Option<&str> {
        self.children.as_deref()
    }

    pub fn has_next(&self) -> bool {
        self.children.is_some()
    }

    /// Tokenizes the remainder; `None` on the last segment.
    pub fn next_step(&self) -> Option<PathStep> {
        self.children.as_deref().map(PathStep::parse)
    }

    /// Every step of the path starting at this one.
    pub fn steps(&self) -> Steps {
        Steps {
            next: Some(self.clone()),
        }
    }
}

impl IntoIterator for PathStep {
    type Item = PathStep;
    type IntoIter = Steps;

    fn into_iter(self) -> Steps {
        Steps { next: Some(self) }
    }
}

#[derive(Debug, Clone)]
pub struct Steps {
    next: Option<PathStep>,
}

impl Iterator for Steps {
    type Item = PathStep;

    fn next(&mut self) -> Option<PathStep> {
        let current = self.next.take()?;
        self.next = current.next_step();
        Some(current)
    }
}

impl FusedIterator for Steps {}
