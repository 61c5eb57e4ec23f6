use std::ops::Deref;
use std::str::FromStr;

use smallvec::SmallVec;

/// Variables captured from the host and path of a matched request, in the
/// order the walk captured them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteVariables {
    buf: SmallVec<[(Box<str>, String); 4]>,
}

impl RouteVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.buf
            .iter()
            .find_map(|(k, v)| if name == &**k { Some(v.as_str()) } else { None })
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.buf.iter().map(|(k, v)| (&**k, v.as_str()))
    }
}

impl Deref for RouteVariables {
    type Target = [(Box<str>, String)];
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl From<&[(&str, &str)]> for RouteVariables {
    fn from(captures: &[(&str, &str)]) -> Self {
        Self {
            buf: captures
                .iter()
                .map(|&(k, v)| (k.into(), v.to_owned()))
                .collect(),
        }
    }
}
