//! HTTP surface of the people resource.
//!
//! | Method | Path               | Success                 | Failure                     |
//! |--------|--------------------|-------------------------|-----------------------------|
//! | GET    | `/people`          | 200, JSON array         |                             |
//! | POST   | `/people`          | 200, empty body         | 400, empty body             |
//! | GET    | `/people/{person}` | 200, JSON object        | 404, `NotFound` envelope    |

use crate::codec::JsonCodec;
use crate::error::ApiError;
use crate::http::{RouteRequest, RouteResponse};
use crate::observability::metrics;
use crate::people::model::Person;
use crate::people::store::PeopleStore;
use crate::routing::{Routable, Route};

pub const PEOPLE_PATH: &str = "/people";
pub const PERSON_PATH: &str = "/people/{person}";
pub const PERSON_NOT_FOUND: &str = "Person Not Found";

/// The people resource module: an in-memory store plus its handlers.
#[derive(Debug, Clone)]
pub struct PeopleRoutes {
    store: PeopleStore,
    codec: JsonCodec,
}

impl PeopleRoutes {
    /// Create the module with an empty store.
    pub fn new(codec: JsonCodec) -> Self {
        Self::with_store(PeopleStore::new(), codec)
    }

    pub fn with_store(store: PeopleStore, codec: JsonCodec) -> Self {
        Self { store, codec }
    }

    pub fn store(&self) -> &PeopleStore {
        &self.store
    }

    /// `GET /people`
    pub fn list(&self, request: &RouteRequest) -> RouteResponse {
        let people = self.store.snapshot();
        tracing::debug!(
            request_id = %request.request_id(),
            count = people.len(),
            "Listing people"
        );
        let result = RouteResponse::ok_json(&self.codec, people.as_slice());
        self.respond(result.map_err(ApiError::Internal))
    }

    /// `POST /people`
    pub fn create(&self, request: &RouteRequest) -> RouteResponse {
        let result = self
            .codec
            .decode::<Person>(request.body())
            .map_err(ApiError::BadRequest)
            .map(|person| {
                tracing::info!(
                    request_id = %request.request_id(),
                    name = %person.name,
                    "Person created"
                );
                self.store.append(person);
                metrics::record_person_stored();
                RouteResponse::ok()
            });

        if let Err(e) = &result {
            tracing::warn!(request_id = %request.request_id(), error = %e, "Rejected person");
        }
        self.respond(result)
    }

    /// `GET /people/{person}`
    pub fn get(&self, request: &RouteRequest) -> RouteResponse {
        let name = request.variable("person").unwrap_or_default();
        let result = match self.store.find(name) {
            Some(person) => {
                RouteResponse::ok_json(&self.codec, &person).map_err(ApiError::Internal)
            }
            None => {
                tracing::debug!(
                    request_id = %request.request_id(),
                    name = %name,
                    "Person not found"
                );
                Err(ApiError::NotFound(PERSON_NOT_FOUND.to_string()))
            }
        };
        self.respond(result)
    }

    fn respond(&self, result: Result<RouteResponse, ApiError>) -> RouteResponse {
        result.unwrap_or_else(|e| e.into_route_response(&self.codec))
    }
}

impl Routable for PeopleRoutes {
    fn routes(&self) -> Vec<Route> {
        let list = self.clone();
        let create = self.clone();
        let get = self.clone();
        vec![
            Route::get(PEOPLE_PATH, move |req: &RouteRequest| list.list(req)),
            Route::post(PEOPLE_PATH, move |req: &RouteRequest| create.create(req)),
            Route::get(PERSON_PATH, move |req: &RouteRequest| get.get(req)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::HttpMethod;
    use axum::http::StatusCode;

    fn routes() -> PeopleRoutes {
        PeopleRoutes::new(JsonCodec::new())
    }

    #[test]
    fn test_routes_are_declared_in_order() {
        let people = routes();
        let declared: Vec<(HttpMethod, String)> = people
            .routes()
            .iter()
            .map(|r| (r.method(), r.path().to_string()))
            .collect();
        assert_eq!(
            declared,
            vec![
                (HttpMethod::Get, "/people".to_string()),
                (HttpMethod::Post, "/people".to_string()),
                (HttpMethod::Get, "/people/{person}".to_string()),
            ]
        );
        assert_eq!(people.routes().len(), 3);
        assert!(people.store().is_empty());
    }

    #[test]
    fn test_create_then_list() {
        let people = routes();
        let res = people.create(&RouteRequest::new(r#"{"name":"bob"}"#));
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.body().is_empty());

        let res = people.list(&RouteRequest::new(""));
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(&res.body()[..], br#"[{"name":"bob"}]"#);
    }

    #[test]
    fn test_list_empty_store() {
        let res = routes().list(&RouteRequest::new(""));
        assert_eq!(&res.body()[..], b"[]");
    }

    #[test]
    fn test_get_existing_person() {
        let people = routes();
        people.create(&RouteRequest::new(r#"{"name": "bob"}"#));

        let res = people.get(&RouteRequest::new("").with_variable("person", "bob"));
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(&res.body()[..], br#"{"name":"bob"}"#);
    }

    #[test]
    fn test_get_missing_person() {
        let res = routes().get(&RouteRequest::new("").with_variable("person", "bob"));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["message"], "Person Not Found");
    }

    #[test]
    fn test_malformed_create_leaves_store_untouched() {
        let people = routes();
        for body in [r#"{"name": "bo"#, "{}", "", "null", r#"{"name": 7}"#] {
            let res = people.create(&RouteRequest::new(body));
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
            assert!(res.body().is_empty());
        }
        assert!(people.store().is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let people = routes();
        people.create(&RouteRequest::new(r#"{"name":"bob"}"#));
        people.create(&RouteRequest::new(r#"{"name":"bob"}"#));
        assert_eq!(people.store().len(), 2);
    }

    #[test]
    fn test_route_handlers_share_the_store() {
        let people = routes();
        let declared = people.routes();
        declared[1].call(&RouteRequest::new(r#"{"name":"eve"}"#));

        let res = declared[2].call(&RouteRequest::new("").with_variable("person", "eve"));
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(people.store().len(), 1);
    }

    #[test]
    fn test_create_increments_store_gauge() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let people = routes();

        ::metrics::with_local_recorder(&recorder, || {
            people.create(&RouteRequest::new(r#"{"name":"a"}"#));
            people.create(&RouteRequest::new("not json"));
            people.create(&RouteRequest::new(r#"{"name":"b"}"#));
        });

        let rendered = handle.render();
        assert!(rendered.contains("people_store_records 2"), "{}", rendered);
    }
}
