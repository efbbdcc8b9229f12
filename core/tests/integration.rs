//! End-to-end test of the client core against a live server.
//!
//! Starts the todo server on a random port, then drives every client
//! operation over real HTTP using ureq.

use todo_core::{
    ApiError, CreateTodo, HttpMethod, HttpRequest, HttpResponse, ReadTodos, TodoClient,
    UpdateTodo,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Status codes are returned as data rather than `Err`, so the core client
/// does the status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, Some(body)) => agent
            .put(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Delete, Some(body)) => agent
            .delete(&req.path)
            .force_send_body()
            .content_type("application/json")
            .send(body.as_bytes()),
        (method, None) => panic!("{} request built without a body", method.as_str()),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn spawn_server() -> TodoClient {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, todo_server::app()).await
        })
        .unwrap();
    });

    TodoClient::new(&format!("http://{addr}"))
}

#[test]
fn crud_lifecycle() {
    let client = spawn_server();

    // Step 1: liveness.
    let message = client.parse_healthz(execute(client.build_healthz())).unwrap();
    assert_eq!(message, "OK");

    // Step 2: read should be empty.
    let req = client.build_read_todos(&ReadTodos::default());
    let todos = client.parse_read_todos(execute(req)).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 3: create seven todos.
    let mut ids = Vec::new();
    for i in 1..=7 {
        let input = CreateTodo {
            subject: format!("Integration {i}"),
            description: String::new(),
        };
        let req = client.build_create_todo(&input).unwrap();
        let created = client.parse_create_todo(execute(req)).unwrap();
        assert_eq!(created.subject, format!("Integration {i}"));
        assert_eq!(created.created_at, created.updated_at);
        ids.push(created.id);
    }

    // Step 4: empty subject is rejected.
    let input = CreateTodo {
        subject: String::new(),
        description: "no subject".to_string(),
    };
    let req = client.build_create_todo(&input).unwrap();
    let err = client.parse_create_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    // Step 5: default page is five, the next page holds the rest.
    let req = client.build_read_todos(&ReadTodos::default());
    let first = client.parse_read_todos(execute(req)).unwrap();
    assert_eq!(first.len(), 5);
    let cursor = ReadTodos::after(&first, None).unwrap();
    let second = client
        .parse_read_todos(execute(client.build_read_todos(&cursor)))
        .unwrap();
    let paged: Vec<i64> = first.iter().chain(&second).map(|t| t.id).collect();
    assert_eq!(paged, ids);

    // Step 6: update.
    let update = UpdateTodo {
        id: ids[0],
        subject: "Updated subject".to_string(),
        description: "now with detail".to_string(),
    };
    let req = client.build_update_todo(&update).unwrap();
    let updated = client.parse_update_todo(execute(req)).unwrap();
    assert_eq!(updated.subject, "Updated subject");
    assert_eq!(updated.description, "now with detail");

    // Step 7: update a missing id.
    let missing = UpdateTodo {
        id: 9999,
        ..update
    };
    let req = client.build_update_todo(&missing).unwrap();
    let err = client.parse_update_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 8: delete with one missing id removes nothing.
    let req = client.build_delete_todos(&[ids[0], 9999]).unwrap();
    let err = client.parse_delete_todos(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 9: delete the first two.
    let req = client.build_delete_todos(&ids[..2]).unwrap();
    client.parse_delete_todos(execute(req)).unwrap();

    // Step 10: the deleted ids never come back.
    let cursor = ReadTodos {
        prev_id: None,
        size: Some(10),
    };
    let todos = client
        .parse_read_todos(execute(client.build_read_todos(&cursor)))
        .unwrap();
    let remaining: Vec<i64> = todos.iter().map(|t| t.id).collect();
    assert_eq!(remaining, ids[2..].to_vec());

    // Step 11: empty delete is rejected.
    let req = client.build_delete_todos(&[]).unwrap();
    let err = client.parse_delete_todos(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}
