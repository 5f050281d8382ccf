//! Installing `Routable` modules into a router.

use crate::routing::route::{Handler, HttpMethod, Routable};

/// A router that exposes one registration call per HTTP method.
///
/// Failures such as duplicate registrations are reported by the
/// implementation through `Self::Error`.
pub trait RouteRegistry {
    type Error;

    fn get(&mut self, path: &str, handler: Handler) -> Result<(), Self::Error>;
    fn head(&mut self, path: &str, handler: Handler) -> Result<(), Self::Error>;
    fn post(&mut self, path: &str, handler: Handler) -> Result<(), Self::Error>;
    fn put(&mut self, path: &str, handler: Handler) -> Result<(), Self::Error>;
    fn patch(&mut self, path: &str, handler: Handler) -> Result<(), Self::Error>;
    fn delete(&mut self, path: &str, handler: Handler) -> Result<(), Self::Error>;
    fn options(&mut self, path: &str, handler: Handler) -> Result<(), Self::Error>;
    fn trace(&mut self, path: &str, handler: Handler) -> Result<(), Self::Error>;
    fn connect(&mut self, path: &str, handler: Handler) -> Result<(), Self::Error>;
}

/// Register every route of `routable` with `registry`, in declaration order.
///
/// The first error reported by the registry stops installation.
pub fn install<R>(registry: &mut R, routable: &dyn Routable) -> Result<(), R::Error>
where
    R: RouteRegistry + ?Sized,
{
    for route in routable.routes() {
        let (method, path, handler) = route.into_parts();
        match method {
            HttpMethod::Get => registry.get(&path, handler)?,
            HttpMethod::Head => registry.head(&path, handler)?,
            HttpMethod::Post => registry.post(&path, handler)?,
            HttpMethod::Put => registry.put(&path, handler)?,
            HttpMethod::Patch => registry.patch(&path, handler)?,
            HttpMethod::Delete => registry.delete(&path, handler)?,
            HttpMethod::Options => registry.options(&path, handler)?,
            HttpMethod::Trace => registry.trace(&path, handler)?,
            HttpMethod::Connect => registry.connect(&path, handler)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{RouteRequest, RouteResponse};
    use crate::routing::route::Route;

    /// Records every registration call it receives.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, String)>,
        reject: Option<&'static str>,
    }

    impl Recorder {
        fn record(&mut self, call: &'static str, path: &str) -> Result<(), String> {
            if self.reject == Some(call) {
                return Err(format!("{} {} rejected", call, path));
            }
            self.calls.push((call, path.to_string()));
            Ok(())
        }
    }

    impl RouteRegistry for Recorder {
        type Error = String;

        fn get(&mut self, path: &str, _: Handler) -> Result<(), String> {
            self.record("get", path)
        }
        fn head(&mut self, path: &str, _: Handler) -> Result<(), String> {
            self.record("head", path)
        }
        fn post(&mut self, path: &str, _: Handler) -> Result<(), String> {
            self.record("post", path)
        }
        fn put(&mut self, path: &str, _: Handler) -> Result<(), String> {
            self.record("put", path)
        }
        fn patch(&mut self, path: &str, _: Handler) -> Result<(), String> {
            self.record("patch", path)
        }
        fn delete(&mut self, path: &str, _: Handler) -> Result<(), String> {
            self.record("delete", path)
        }
        fn options(&mut self, path: &str, _: Handler) -> Result<(), String> {
            self.record("options", path)
        }
        fn trace(&mut self, path: &str, _: Handler) -> Result<(), String> {
            self.record("trace", path)
        }
        fn connect(&mut self, path: &str, _: Handler) -> Result<(), String> {
            self.record("connect", path)
        }
    }

    fn noop(_: &RouteRequest) -> RouteResponse {
        RouteResponse::ok()
    }

    #[test]
    fn test_every_method_reaches_its_registration_call() {
        let routes: Vec<Route> = HttpMethod::ALL
            .iter()
            .map(|m| Route::new(*m, format!("/{}", m.as_str().to_lowercase()), noop))
            .collect();

        let mut recorder = Recorder::default();
        install(&mut recorder, &routes).unwrap();

        let expected: Vec<(&str, String)> = [
            "get", "head", "post", "put", "patch", "delete", "options", "trace", "connect",
        ]
        .iter()
        .map(|name| (*name, format!("/{}", name)))
        .collect();
        assert_eq!(recorder.calls, expected);
    }

    #[test]
    fn test_installation_follows_declaration_order() {
        let routes = vec![
            Route::post("/b", noop),
            Route::get("/a", noop),
            Route::get("/c", noop),
        ];
        let mut recorder = Recorder::default();
        install(&mut recorder, &routes).unwrap();

        let paths: Vec<&str> = recorder.calls.iter().map(|(_, p)| p.as_str()).collect();
        assert_eq!(paths, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_registry_error_is_propagated() {
        let routes = vec![
            Route::get("/a", noop),
            Route::post("/a", noop),
            Route::get("/b", noop),
        ];
        let mut recorder = Recorder {
            reject: Some("post"),
            ..Default::default()
        };
        let err = install(&mut recorder, &routes).unwrap_err();

        assert_eq!(err, "post /a rejected");
        assert_eq!(recorder.calls, vec![("get", "/a".to_string())]);
    }
}
