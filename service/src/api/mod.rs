use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::HotelService;

mod booking;
mod customer;
mod employee;
mod govt_id;
mod role;
mod room;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// kept out of the trace layer so health checks do not flood the logs
pub(crate) fn health_router() -> Router<HotelService> {
    Router::new().route("/health", get(health))
}

pub(crate) fn router() -> Router<HotelService> {
    Router::new()
        .route("/emp/add/", post(employee::add))
        .route("/emp/", get(employee::get))
        .route("/emp/list/", get(employee::list))
        .route("/emp/manage/:emp_id", put(employee::manage))
        .route("/emp/login/", post(employee::login))
        .route(
            "/emp/role/:emp_id",
            get(employee::roles).put(employee::assign_role),
        )
        .route("/role/add/", post(role::add))
        .route("/role/list/", get(role::list))
        .route("/room/type/add/", post(room::add_type))
        .route("/room/type/list/", get(room::list_types))
        .route("/room/state/add/", post(room::add_state))
        .route("/room/state/list/", get(room::list_states))
        .route("/room/add/", post(room::add))
        .route("/room/list/", get(room::list))
        .route("/room/update/:room_number", put(room::update))
        .route("/cust/add/", post(customer::add))
        .route("/cust/", get(customer::get))
        .route("/cust/list/", get(customer::list))
        .route("/gov_id/add/", post(govt_id::add))
        .route("/gov_id/list/", get(govt_id::list))
        .route("/booking/status/list/", get(booking::list_statuses))
        .route("/booking/add/", post(booking::add))
        .route("/booking/list/", get(booking::list))
        .route("/booking/:booking_id", get(booking::get))
        .route("/booking/update/:booking_id", put(booking::update))
        .route("/booking/cancel/:booking_id", put(booking::cancel))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{router, test_utils::TestConfig};

    async fn send(req: Request<Body>) -> (StatusCode, Value) {
        let app = router(TestConfig::default().service());
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn booking(checkin: &str, checkout: &str, exp_date: &str) -> Value {
        json!({
            "customer": {
                "customer_details": {
                    "first_name": "Meera",
                    "middle_name": null,
                    "last_name": "Nair",
                    "email": "meera@example.com",
                    "phone": "555-0100"
                },
                "customer_address": {
                    "first_line": "7 Beach Road",
                    "second_line": null,
                    "landmark": null,
                    "district": "Kochi",
                    "state": "Kerala",
                    "pin": "682001",
                    "address_type": "Permanent"
                }
            },
            "booking": {
                "booked_on": "2025-02-01T09:30:00Z",
                "checkin": checkin,
                "checkout": checkout,
                "government_id_type": "Passport",
                "government_id_number": "K1234567",
                "exp_date": exp_date,
                "room_num": 101,
                "emp_id": 1
            }
        })
    }

    #[tokio::test]
    async fn health_should_be_ok() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn reversed_stay_should_be_bad_request() {
        let req = json_request(
            "POST",
            "/booking/add/",
            booking("2025-03-05", "2025-03-01", "2026-01-01"),
        );
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"detail": "check-in date must precede check-out date"})
        );
    }

    #[tokio::test]
    async fn expiring_govt_id_should_be_bad_request() {
        let req = json_request(
            "POST",
            "/booking/add/",
            booking("2025-03-01", "2025-03-05", "2025-06-01"),
        );
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("2025-06-01"));
    }

    #[tokio::test]
    async fn lookup_without_key_should_be_bad_request() {
        let (status, body) = send(get("/emp/")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"detail": "invalid payload: exactly one of id, email or phone is required"})
        );

        let (status, _) = send(get("/cust/?id=1&phone=555-0100")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_page_should_be_bad_request() {
        let (status, body) = send(get("/booking/list/?status=Booked&limit=1000")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"detail": "invalid page size 1000, expected 1..=100"})
        );

        let (status, _) = send(get("/room/list/?skip=-5")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_updates_should_be_bad_request() {
        let (status, _) = send(json_request("PUT", "/booking/update/1", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(json_request("PUT", "/room/update/101", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_room_should_be_bad_request() {
        let req = json_request(
            "POST",
            "/room/add/",
            json!({"room_number": 0, "room_type": "Deluxe"}),
        );
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn overlong_reference_names_should_be_bad_request() {
        for uri in ["/gov_id/add/", "/room/type/add/", "/room/state/add/"] {
            let req = json_request("POST", uri, json!({"name": "Presidential Suite Deluxe"}));
            let (status, body) = send(req).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["detail"]
                .as_str()
                .unwrap()
                .ends_with("name must be at most 20 characters"));
        }
    }

    #[tokio::test]
    async fn incomplete_credentials_should_be_bad_request() {
        let req = json_request(
            "POST",
            "/emp/login/",
            json!({"email": "ravi@example.com", "password": ""}),
        );
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = json_request(
            "POST",
            "/emp/login/",
            json!({"email": "not-an-email", "password": "s3cret"}),
        );
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blank_role_names_should_be_bad_request() {
        let req = json_request(
            "POST",
            "/role/add/",
            json!({"name": "  ", "permissions": "rooms:read"}),
        );
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "invalid payload: role name is required"}));

        let (status, _) = send(json_request("PUT", "/emp/role/1", json!({"role": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_should_be_not_found() {
        let (status, _) = send(get("/no/such/route")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
