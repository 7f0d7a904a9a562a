//! Request abstraction consumed by the accessors.

use http::request::Parts;
use http::Request;
use webstrap_router::PathVars;

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// A variable captured by the router from the path template.
    Path,
    /// A key in the URL query string.
    Query,
}

/// Anything parameters can be read from.
///
/// Implemented for [`http::Request`], [`http::request::Parts`], references
/// to either, and `Option<S>`, where `None` stands for a missing request.
/// Every accessor treats a source that is not present as if the parameter
/// were absent.
pub trait ParamSource {
    /// Returns false when there is no request to read from.
    fn is_present(&self) -> bool {
        true
    }

    /// Variables captured by the router, if any were attached.
    fn path_vars(&self) -> Option<&PathVars>;

    /// The undecoded query string, without the leading `?`.
    fn raw_query(&self) -> Option<&str>;
}

impl<B> ParamSource for Request<B> {
    fn path_vars(&self) -> Option<&PathVars> {
        self.extensions().get::<PathVars>()
    }

    fn raw_query(&self) -> Option<&str> {
        self.uri().query()
    }
}

impl ParamSource for Parts {
    fn path_vars(&self) -> Option<&PathVars> {
        self.extensions.get::<PathVars>()
    }

    fn raw_query(&self) -> Option<&str> {
        self.uri.query()
    }
}

impl<S: ParamSource + ?Sized> ParamSource for &S {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }

    fn path_vars(&self) -> Option<&PathVars> {
        (**self).path_vars()
    }

    fn raw_query(&self) -> Option<&str> {
        (**self).raw_query()
    }
}

impl<S: ParamSource> ParamSource for Option<S> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(ParamSource::is_present)
    }

    fn path_vars(&self) -> Option<&PathVars> {
        self.as_ref().and_then(ParamSource::path_vars)
    }

    fn raw_query(&self) -> Option<&str> {
        self.as_ref().and_then(ParamSource::raw_query)
    }
}
