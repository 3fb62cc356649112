mod common;

use axum::http::StatusCode;
use chrono::{Duration, TimeZone, Weekday};
use common::{course_today, hm, parse_body, upcoming, TestApp};
use serde_json::json;
use teetime_backend::{
    domain::models::reservation::Reservation,
    domain::models::season::{Tier, TierType},
    domain::ports::ReservationRepository,
    infra::repositories::sqlite_reservation_repo::SqliteReservationRepo,
};

#[tokio::test]
async fn test_cancel_reopens_slot() {
    let app = TestApp::new().await;
    app.seed_current_season().await;
    let ann = app.seed_golfer("Ann").await;
    let bob = app.seed_golfer("Bob").await;
    let date = upcoming(Weekday::Wed);
    let sheet_uri = format!("/api/v1/tee-times?date={}", date);

    // a full foursome: the owner plus three
    let res = app.send("POST", "/api/v1/tee-times/book", Some(&ann.id), Some(json!({
        "date": date, "slot": 3,
        "players": [
            {"kind": "registered", "golfer_id": bob.id},
            {"kind": "guest", "name": "Sam"},
            {"kind": "guest", "name": "Kim"}
        ]
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let sheet = parse_body(app.send("GET", &sheet_uri, None, None).await).await;
    assert_eq!(sheet[0]["slots"][2]["open"], false);
    assert_eq!(sheet[0]["slots"][2]["occupancy"], 4);

    let res = app.send("POST", &format!("/api/v1/reservations/{}/cancel", id), Some(&ann.id), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cancelled = parse_body(res).await;
    assert_eq!(cancelled["cancelled"], true);
    assert!(cancelled["cancelled_at"].is_string());

    let sheet = parse_body(app.send("GET", &sheet_uri, None, None).await).await;
    assert_eq!(sheet[0]["slots"][2]["open"], true);
    assert_eq!(sheet[0]["slots"][2]["occupancy"], 0);
    assert_eq!(sheet[0]["open_count"], 71);

    let res = app.send("POST", "/api/v1/tee-times/book", Some(&bob.id), Some(json!({ "date": date, "slot": 3 }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_only_owner_may_cancel_and_only_once() {
    let app = TestApp::new().await;
    app.seed_current_season().await;
    let ann = app.seed_golfer("Ann").await;
    let bob = app.seed_golfer("Bob").await;

    let res = app.send("POST", "/api/v1/tee-times/book", Some(&ann.id), Some(json!({
        "date": upcoming(Weekday::Thu), "slot": 10
    }))).await;
    let id = parse_body(res).await["id"].as_str().unwrap().to_string();
    let cancel_uri = format!("/api/v1/reservations/{}/cancel", id);

    let res = app.send("POST", &cancel_uri, Some(&bob.id), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.send("POST", &cancel_uri, Some(&ann.id), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.send("POST", &cancel_uri, Some(&ann.id), None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_roster_with_guests_round_trips() {
    let app = TestApp::new().await;
    app.seed_current_season().await;
    let ann = app.seed_golfer("Ann").await;
    let bob = app.seed_golfer("Bob").await;
    let date = upcoming(Weekday::Fri);

    let res = app.send("POST", "/api/v1/tee-times/book", Some(&ann.id), Some(json!({
        "date": date, "time": "08:00",
        "players": [
            {"kind": "guest", "name": "Sam", "email": "sam@example.com"},
            {"kind": "registered", "golfer_id": bob.id},
            {"kind": "guest", "name": "Kim", "phone": "555-0101"}
        ]
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app.send("GET", "/api/v1/reservations", Some(&ann.id), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let list = parse_body(res).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);

    let players = list[0]["players"].as_array().unwrap();
    assert_eq!(players.len(), 3);
    assert_eq!(players[0]["kind"], "guest");
    assert_eq!(players[0]["name"], "Sam");
    assert_eq!(players[0]["email"], "sam@example.com");
    assert_eq!(players[1]["kind"], "registered");
    assert_eq!(players[1]["id"], bob.id);
    assert_eq!(players[2]["name"], "Kim");
    assert_eq!(players[2]["phone"], "555-0101");
    assert_eq!(list[0]["booking_user"]["id"], ann.id);
    assert_eq!(list[0]["tee_date"], date.to_string());

    // co-players do not own the reservation
    let res = app.send("GET", "/api/v1/reservations", Some(&bob.id), None).await;
    assert!(parse_body(res).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upcoming_and_past_listings() {
    let app = TestApp::new().await;
    app.seed_current_season().await;
    let ann = app.seed_golfer("Ann").await;
    let repo = SqliteReservationRepo::new(app.pool.clone());
    let tier = Tier::new("s1".into(), TierType::WeekdayMidday, "Weekday Midday", hm(7, 37), hm(13, 59), 60.0);
    let tz = chrono_tz::America::New_York;

    for (id, days_ago) in [("old", 40), ("older", 90), ("ancient", 400)] {
        let date = course_today() - Duration::days(days_ago);
        let tee = tz.from_local_datetime(&date.and_time(hm(9, 0))).single().unwrap();
        let mut res = Reservation::new(Some(ann.clone()), vec![], tee, 5, &tier);
        res.id = Some(id.to_string());
        repo.create_booking(&res).await.unwrap();
    }

    for slot in [20, 4] {
        let res = app.send("POST", "/api/v1/tee-times/book", Some(&ann.id), Some(json!({
            "date": upcoming(Weekday::Wed), "slot": slot
        }))).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let upcoming_list = parse_body(app.send("GET", "/api/v1/reservations", Some(&ann.id), None).await).await;
    let slots: Vec<i64> = upcoming_list.as_array().unwrap().iter().map(|r| r["slot"].as_i64().unwrap()).collect();
    assert_eq!(slots, vec![4, 20]);

    let history = parse_body(app.send("GET", "/api/v1/reservations?include_past=true", Some(&ann.id), None).await).await;
    let ids: Vec<&str> = history.as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(&ids[2..], &["old", "older"]);
    assert!(!ids.contains(&"ancient"));
}

#[tokio::test]
async fn test_listing_requires_golfer() {
    let app = TestApp::new().await;
    let res = app.send("GET", "/api/v1/reservations", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
