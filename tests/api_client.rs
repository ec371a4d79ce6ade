use bookshare_cli::api::{ApiClient, BookshareApi};
use bookshare_cli::config::Config;
use bookshare_cli::error::ClientError;
use bookshare_cli::models::{
    AvailabilityType, BookRequest, Condition, LoginRequest, NewBook, RequestType,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// The client is blocking, so it is built, used and dropped off the async
// runtime.
async fn with_client<T, F>(server: &MockServer, token: Option<&'static str>, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&ApiClient) -> T + Send + 'static,
{
    let base = format!("{}/api", server.uri());
    tokio::task::spawn_blocking(move || {
        let mut api = ApiClient::new(&Config::new(base, std::env::temp_dir()))
            .expect("Failed to build client");
        if let Some(token) = token {
            api.set_token(token);
        }
        f(&api)
    })
    .await
    .expect("client task panicked")
}

#[tokio::test]
async fn listing_is_fetched_without_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "books": [{
                "id": 7,
                "title": "Dune",
                "author": "Herbert",
                "condition": "Good",
                "availabilityType": "rent",
                "rentPrice": 50,
                "salePrice": null,
                "description": null,
                "location": "Pune",
                "owner": "ravi",
                "ownerId": 2
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let books = with_client(&server, Some("tok"), |api| api.list_books())
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Dune");
    assert_eq!(books[0].rent_price, Some(50));
    assert_eq!(books[0].sale_price, None);

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn owned_books_carry_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books/my"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "books": [{
                "id": 3,
                "title": "Emma",
                "author": "Austen",
                "condition": "Fair",
                "location": "Pune",
                "isAvailable": false,
                "rentPrice": null,
                "salePrice": 90
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let books = with_client(&server, Some("tok-123"), |api| api.my_books())
        .await
        .unwrap();
    assert!(!books[0].is_available);
    assert_eq!(books[0].sale_price, Some(90));
}

#[tokio::test]
async fn add_book_posts_full_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/books"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({
            "title": "Dune",
            "author": "Herbert",
            "condition": "Like New",
            "availabilityType": "both",
            "rentPrice": 40,
            "salePrice": null,
            "description": "",
            "location": "Pune"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "Book added successfully",
            "book_id": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let book = NewBook {
        title: "Dune".into(),
        author: "Herbert".into(),
        condition: Condition::LikeNew,
        availability_type: AvailabilityType::Both,
        rent_price: Some(40),
        sale_price: None,
        description: String::new(),
        location: "Pune".into(),
    };
    let message = with_client(&server, Some("tok"), move |api| api.add_book(&book))
        .await
        .unwrap();
    assert_eq!(message.as_deref(), Some("Book added successfully"));
}

#[tokio::test]
async fn rejected_delete_keeps_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/books/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "Book not found or unauthorized"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = with_client(&server, Some("tok"), |api| api.delete_book(42))
        .await
        .unwrap_err();
    match err {
        ClientError::Rejected { message } => {
            assert_eq!(message.as_deref(), Some("Book not found or unauthorized"))
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn request_rejected_without_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/requests"))
        .and(body_json(json!({
            "bookId": 7,
            "requestType": "rent",
            "message": "Can I borrow it?"
        })))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "success": false })))
        .expect(1)
        .mount(&server)
        .await;

    let request = BookRequest {
        book_id: 7,
        request_type: RequestType::Rent,
        message: "Can I borrow it?".into(),
    };
    let err = with_client(&server, Some("tok"), move |api| api.send_request(&request))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected { message: None }));
}

#[tokio::test]
async fn non_json_body_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = with_client(&server, None, |api| api.list_books())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[test]
fn unreachable_backend_is_a_transport_failure() {
    let api = ApiClient::new(&Config::new("http://127.0.0.1:1/api", std::env::temp_dir())).unwrap();
    assert!(matches!(api.list_books(), Err(ClientError::Transport(_))));
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "email": "asha@example.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "token": "tok-123",
            "user": {
                "user_id": 1,
                "username": "asha",
                "email": "asha@example.com",
                "location": "Pune"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req = LoginRequest {
        email: "asha@example.com".into(),
        password: "pw".into(),
    };
    let payload = with_client(&server, None, move |api| api.login(&req))
        .await
        .unwrap();
    assert_eq!(payload.token.as_deref(), Some("tok-123"));
    let user = payload.user.unwrap();
    assert_eq!(user.username, "asha");
    assert_eq!(user.location, "Pune");
}

#[tokio::test]
async fn sent_requests_are_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/requests/sent"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "requests": [{
                "requestId": 5,
                "bookId": 7,
                "bookTitle": "Dune",
                "bookAuthor": "Herbert",
                "ownerName": "ravi",
                "ownerEmail": "ravi@example.com",
                "requestType": "buy",
                "message": "Still available?",
                "status": "pending",
                "createdAt": "2024-05-01 10:00:00"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let requests = with_client(&server, Some("tok"), |api| api.sent_requests())
        .await
        .unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].request_type, RequestType::Buy);
    assert_eq!(requests[0].owner_name.as_deref(), Some("ravi"));
    assert_eq!(requests[0].requester_name, None);
}
