pub mod count;
pub mod create;
pub mod delete;
pub mod list;
pub mod params;
pub mod show;
pub mod update;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use roster_core::Data;
    use roster_database::MemoryStore;

    use crate::{app, router};

    // 2010-01-01T00:00:00Z
    const BIRTHDAY_2010: i64 = 1_262_304_000_000;

    fn test_router() -> Router {
        router(Data::new(Arc::new(MemoryStore::new())))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn player_body(name: &str, race: &str, experience: i32) -> Value {
        json!({
            "name": name,
            "title": "Of the Shire",
            "race": race,
            "profession": "ROGUE",
            "birthday": BIRTHDAY_2010,
            "experience": experience,
        })
    }

    async fn seed(app: &Router) {
        for (name, race, experience) in [
            ("Frodo", "HOBBIT", 100),
            ("Sam", "HOBBIT", 2_000),
            ("Gimli", "DWARF", 150),
            ("Legolas", "ELF", 5_000),
            ("Merry", "HOBBIT", 200),
        ] {
            let (status, _) = send(
                app,
                Method::POST,
                "/players",
                Some(player_body(name, race, experience)),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn create_and_fetch_round_trip() {
        let app = test_router();
        let (status, created) = send(
            &app,
            Method::POST,
            "/players",
            Some(player_body("Bilbo", "HOBBIT", 0)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["id"], 1);
        assert_eq!(created["level"], 0);
        assert_eq!(created["untilNextLevel"], 100);
        assert_eq!(created["banned"], false);
        assert_eq!(created["birthday"], BIRTHDAY_2010);

        let (status, fetched) = send(&app, Method::GET, "/players/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn creation_validation_maps_to_bad_request() {
        let app = test_router();

        let mut missing = player_body("Bilbo", "HOBBIT", 0);
        missing.as_object_mut().unwrap().remove("title");
        let (status, body) = send(&app, Method::POST, "/players", Some(missing)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please fill in all required fields");

        let (status, _) = send(
            &app,
            Method::POST,
            "/players",
            Some(player_body("Bilbo", "HOBBIT", 10_000_001)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/players",
            Some(player_body("Bilbo", "GOBLIN", 0)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_ids_are_bad_requests() {
        let app = test_router();
        for uri in ["/players/0", "/players/abc", "/players/-4"] {
            let (status, _) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }

        let (status, body) = send(&app, Method::DELETE, "/players/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ID is not a number");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let app = test_router();
        let (status, body) = send(&app, Method::GET, "/players/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Player is not found");

        let (status, _) = send(&app, Method::DELETE, "/players/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::POST,
            "/players/77",
            Some(json!({ "banned": true })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_merges_present_fields() {
        let app = test_router();
        seed(&app).await;

        let (status, updated) = send(
            &app,
            Method::POST,
            "/players/1",
            Some(json!({ "experience": 1_500, "title": null })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["experience"], 1_500);
        assert_eq!(updated["level"], 5);
        assert_eq!(updated["untilNextLevel"], 600);
        assert_eq!(updated["title"], "Of the Shire");
        assert_eq!(updated["name"], "Frodo");

        let (status, _) = send(
            &app,
            Method::POST,
            "/players/1",
            Some(json!({ "name": "A name far too long" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        for body in [
            json!({ "title": "x".repeat(31) }),
            json!({ "birthday": 946_684_799_000_i64 }),
        ] {
            let (status, _) = send(&app, Method::POST, "/players/1", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        let (_, unchanged) = send(&app, Method::GET, "/players/1", None).await;
        assert_eq!(unchanged["title"], "Of the Shire");
        assert_eq!(unchanged["birthday"], BIRTHDAY_2010);
    }

    #[tokio::test]
    async fn delete_removes_player() {
        let app = test_router();
        seed(&app).await;

        let (status, _) = send(&app, Method::DELETE, "/players/2", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::GET, "/players/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_applies_defaults_filters_and_order() {
        let app = test_router();
        seed(&app).await;

        let (status, page) = send(&app, Method::GET, "/players", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = page.as_array().unwrap().iter().map(|p| p["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);

        let (_, page) = send(
            &app,
            Method::GET,
            "/players?minExperience=100&maxExperience=200&order=EXPERIENCE&pageSize=10",
            None,
        )
        .await;
        let names: Vec<_> = page.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
        assert_eq!(names, vec![json!("Frodo"), json!("Gimli"), json!("Merry")]);

        let (_, page) = send(
            &app,
            Method::GET,
            "/players?race=HOBBIT&pageNumber=1&pageSize=2",
            None,
        )
        .await;
        let names: Vec<_> = page.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
        assert_eq!(names, vec![json!("Merry")]);
    }

    #[tokio::test]
    async fn list_rejects_bad_parameters() {
        let app = test_router();
        for uri in [
            "/players?race=GOBLIN",
            "/players?order=TITLE",
            "/players?minLevel=high",
            "/players?pageSize=0",
        ] {
            let (status, _) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn blank_query_values_are_ignored() {
        let app = test_router();
        seed(&app).await;

        let (status, page) = send(
            &app,
            Method::GET,
            "/players?minExperience=&banned=&race=&after=&pageNumber=&pageSize=",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page.as_array().unwrap().len(), 3);

        let (status, count) = send(&app, Method::GET, "/players/count?maxLevel=&order=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(count, json!(5));
    }

    #[tokio::test]
    async fn count_path_is_not_an_id_for_other_methods() {
        let app = test_router();
        for method in [Method::POST, Method::DELETE] {
            let (status, body) = send(&app, method, "/players/count", Some(json!({}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "ID is not a number");
        }

        let (status, _) = send(&app, Method::GET, "/players/%2042", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn count_matches_unpaged_listing() {
        let app = test_router();
        seed(&app).await;

        let (status, count) = send(&app, Method::GET, "/players/count?race=HOBBIT", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(count, json!(3));

        let (_, page) = send(
            &app,
            Method::GET,
            "/players?race=HOBBIT&pageSize=100",
            None,
        )
        .await;
        assert_eq!(page.as_array().unwrap().len(), 3);

        let (_, count) = send(&app, Method::GET, "/players/count?minLevel=5", None).await;
        assert_eq!(count, json!(2));

        let (status, _) = send(&app, Method::GET, "/players/count?profession=BARD", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn app_mounts_under_base_path() {
        let app = app(Data::new(Arc::new(MemoryStore::new())), "/rest/");

        let (status, count) = send(&app, Method::GET, "/rest/players/count", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(count, json!(0));

        let (status, _) = send(&app, Method::GET, "/players/count", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
