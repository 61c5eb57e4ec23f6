use super::captures::RouteVariables;
use super::match_result::MatchResult;
use super::route::{ConstraintContext, Route};
use super::Router;

use crate::trie::{CaptureBuf, TrieNode};

use std::ops::ControlFlow;
use std::sync::Arc;

use http::{HeaderMap, Method};
use smallvec::SmallVec;
use tracing::{trace, warn};

type Parts<'r> = SmallVec<[&'r str; 8]>;

impl<A> Router<A> {
    /// Matches a request against every registered route.
    ///
    /// Literal children are tried before variable children, variable
    /// children in registration order, host-bound routes before host-less
    /// routes of the same path. The first route that allows `method`
    /// and whose constraints pass wins; if every route matching the host and
    /// path rejects the method, the result lists the methods they accept.
    pub fn find_with_headers(
        &self,
        method: &Method,
        host: &str,
        path: &str,
        headers: &HeaderMap,
    ) -> MatchResult<A> {
        let host_key = normalize_host(host);
        let labels = split_labels(&host_key);
        let segments = split_segments(path);

        let mut allowed: Vec<Method> = Vec::new();
        let mut found: Option<(Arc<Route<A>>, RouteVariables)> = None;

        let mut visit = |route: &Arc<Route<A>>, captures: &[(&str, &str)]| {
            if !route.allows_method(method) {
                for m in route.methods() {
                    if !allowed.contains(m) {
                        allowed.push(m.clone());
                    }
                }
                return ControlFlow::Continue(());
            }

            let cx = ConstraintContext {
                method,
                host,
                path,
                headers,
                variables: captures,
            };
            if !route.constraints().iter().all(|c| c.passes(&cx)) {
                return ControlFlow::Continue(());
            }

            found = Some((Arc::clone(route), RouteVariables::from(captures)));
            ControlFlow::Break(())
        };

        let mut walk = Walk {
            steps_left: self.config.max_match_steps,
            exhausted: false,
        };
        let mut captures = CaptureBuf::new();
        let _ = walk.descend(&self.root, &segments, Some(&labels[..]), &mut captures, &mut visit);

        if walk.exhausted {
            warn!(
                host,
                path,
                max_match_steps = self.config.max_match_steps,
                "match gave up after exhausting its step budget"
            );
        }

        let result = match found {
            Some((route, variables)) => MatchResult::found(route, variables),
            None if !allowed.is_empty() => MatchResult::method_not_allowed(allowed),
            None => MatchResult::not_found(),
        };
        trace!(
            %method,
            host,
            path,
            found = result.is_found(),
            method_is_allowed = ?result.method_is_allowed(),
            "matched request"
        );
        result
    }
}

struct Walk {
    steps_left: usize,
    exhausted: bool,
}

impl Walk {
    fn step(&mut self) -> ControlFlow<()> {
        if self.steps_left == 0 {
            self.exhausted = true;
            return ControlFlow::Break(());
        }
        self.steps_left -= 1;
        ControlFlow::Continue(())
    }

    /// `labels` is `Some` while walking the path trie and `None` inside a
    /// host trie.
    fn descend<'t, 'r, A, F>(
        &mut self,
        node: &'t TrieNode<A>,
        segments: &[&'r str],
        labels: Option<&[&'r str]>,
        captures: &mut CaptureBuf<'t, 'r>,
        visit: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(&Arc<Route<A>>, &[(&str, &str)]) -> ControlFlow<()>,
    {
        let (segment, rest) = match segments.split_first() {
            Some((&segment, rest)) => (segment, rest),
            None => {
                // routes bound to a host win over host-less ones on the same path
                if let (Some(labels), Some(host)) = (labels, node.host_trie()) {
                    self.descend(host, labels, None, captures, visit)?;
                }
                for route in node.routes() {
                    visit(route, &captures[..])?;
                }
                return ControlFlow::Continue(());
            }
        };

        if let Some(child) = node.literal(segment) {
            self.step()?;
            self.descend(child, rest, labels, captures, visit)?;
        }

        for child in node.variables() {
            self.step()?;
            let key = match child.variable_segment() {
                Some(key) => key,
                None => continue,
            };
            let mark = captures.len();
            if key.capture(segment, captures) {
                self.descend(child, rest, labels, captures, visit)?;
                captures.truncate(mark);
            }
        }
        ControlFlow::Continue(())
    }
}

/// Drops the port and a trailing dot, then lowercases.
pub(crate) fn normalize_host(host: &str) -> String {
    let host = if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    };
    host.trim_end_matches('.').to_ascii_lowercase()
}

/// Host labels from the rightmost one inwards.
fn split_labels(host: &str) -> Parts<'_> {
    if host.is_empty() {
        return Parts::new();
    }
    host.split('.').rev().collect()
}

/// Leading and trailing slashes are ignored, inner empty segments are kept.
pub(crate) fn split_segments(path: &str) -> Parts<'_> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Parts::new();
    }
    path.split('/').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts_lose_port_and_case() {
        assert_eq!(normalize_host("Example.COM:8080"), "example.com");
        assert_eq!(normalize_host("example.com."), "example.com");
        assert_eq!(normalize_host("[::1]:443"), "[::1]");
        assert_eq!(&split_labels("api.example.com")[..], &["com", "example", "api"]);
        assert!(split_labels("").is_empty());
    }

    #[test]
    fn path_segments_keep_inner_empties() {
        assert!(split_segments("/").is_empty());
        assert!(split_segments("").is_empty());
        assert_eq!(&split_segments("/users/42/")[..], &["users", "42"]);
        assert_eq!(&split_segments("/a//b")[..], &["a", "", "b"]);
    }
}
