//! The same user scenarios against both adapters.
//!
//! The remote adapter runs against a real `todo-server` app served on a
//! random port with an in-memory collection.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::timeout;

use todo_client::{
    ClientConfig, FileStorage, HttpBackend, LocalTodoStore, RemoteBackend, RemoteTodoStore,
    TodoContext, TodoState, TodoStore,
};
use todo_server::db::MemoryTodoRepository;
use todo_server::{serve, AppState};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Serve a fresh todo server on a random port and return its base URL.
async fn start_server() -> String {
    let state = AppState::new(Arc::new(MemoryTodoRepository::new()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        serve(listener, state).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

async fn remote_store() -> Arc<dyn TodoStore> {
    let url = start_server().await;
    let backend = Arc::new(HttpBackend::new(&url).unwrap());
    let store: Arc<dyn TodoStore> = Arc::new(RemoteTodoStore::with_reconnect_delay(
        backend,
        Duration::from_millis(50),
    ));
    wait_for(&store, |s| !s.is_loading).await;
    store
}

async fn local_store(dir: &std::path::Path) -> Arc<dyn TodoStore> {
    let storage = Arc::new(FileStorage::new(dir));
    Arc::new(LocalTodoStore::open(storage).await)
}

/// Wait until the published state satisfies `condition`.
async fn wait_for(store: &Arc<dyn TodoStore>, condition: impl Fn(&TodoState) -> bool) -> TodoState {
    let mut rx = store.subscribe();
    let state = timeout(TEST_TIMEOUT, rx.wait_for(|state| condition(state)))
        .await
        .expect("timed out waiting for state")
        .unwrap()
        .clone();
    state
}

fn texts(state: &TodoState) -> Vec<&str> {
    state.todos.iter().map(|t| t.text.as_str()).collect()
}

/// Buy milk / Walk dog, step by step.
async fn shopping_scenario(store: Arc<dyn TodoStore>) {
    store.add("Buy milk").await.unwrap();
    store.add("Walk dog").await.unwrap();

    let state = wait_for(&store, |s| s.todos.len() == 2).await;
    assert_eq!(texts(&state), vec!["Walk dog", "Buy milk"]);
    assert!(state.todos.iter().all(|t| !t.is_completed));
    let walk_dog = state.todos[0].id.clone();
    let buy_milk = state.todos[1].id.clone();

    store.toggle(&buy_milk).await.unwrap();
    let state = wait_for(&store, |s| s.completed_count() == 1).await;
    assert!(state.todos[1].is_completed);
    assert!(!state.todos[0].is_completed);
    assert_eq!(state.progress_percentage(), 50.0);

    // Empty text leaves the record alone
    store.update(&walk_dog, "   ").await.unwrap();
    store.update(&walk_dog, "Walk the dog").await.unwrap();
    let state = wait_for(&store, |s| s.todos[0].text == "Walk the dog").await;
    assert_eq!(texts(&state), vec!["Walk the dog", "Buy milk"]);

    store.delete(&walk_dog).await.unwrap();
    let state = wait_for(&store, |s| s.todos.len() == 1).await;
    assert_eq!(texts(&state), vec!["Buy milk"]);

    assert_eq!(store.clear_all().await.unwrap(), 1);
    wait_for(&store, |s| s.todos.is_empty()).await;
    assert_eq!(store.clear_all().await.unwrap(), 0);
}

/// Toggling twice restores the flag; empty adds change nothing.
async fn involution_scenario(store: Arc<dyn TodoStore>) {
    store.add("").await.unwrap();
    store.add(" \t ").await.unwrap();
    store.add("  Read book  ").await.unwrap();

    let state = wait_for(&store, |s| s.todos.len() == 1).await;
    assert_eq!(texts(&state), vec!["Read book"]);
    let id = state.todos[0].id.clone();

    store.toggle(&id).await.unwrap();
    wait_for(&store, |s| s.todos[0].is_completed).await;
    store.toggle(&id).await.unwrap();
    let state = wait_for(&store, |s| !s.todos[0].is_completed).await;
    assert_eq!(state.todos.len(), 1);
}

#[tokio::test]
async fn local_shopping_scenario() {
    let dir = tempfile::tempdir().unwrap();
    shopping_scenario(local_store(dir.path()).await).await;
}

#[tokio::test]
async fn remote_shopping_scenario() {
    shopping_scenario(remote_store().await).await;
}

#[tokio::test]
async fn local_involution_scenario() {
    let dir = tempfile::tempdir().unwrap();
    involution_scenario(local_store(dir.path()).await).await;
}

#[tokio::test]
async fn remote_involution_scenario() {
    involution_scenario(remote_store().await).await;
}

#[tokio::test]
async fn lookup_miss_differs_between_backends() {
    let dir = tempfile::tempdir().unwrap();
    let local = local_store(dir.path()).await;
    let remote = remote_store().await;

    for store in [&local, &remote] {
        store.add("Buy milk").await.unwrap();
        wait_for(store, |s| s.todos.len() == 1).await;
    }

    // On-device: silent no-op
    local.toggle("missing").await.unwrap();
    local.update("missing", "text").await.unwrap();
    local.delete("missing").await.unwrap();
    assert_eq!(texts(&local.state()), vec!["Buy milk"]);

    // Remote: the server reports the miss
    for result in [
        remote.toggle("missing").await,
        remote.update("missing", "text").await,
        remote.delete("missing").await,
    ] {
        assert!(result.unwrap_err().is_not_found());
    }
    assert_eq!(texts(&remote.state()), vec!["Buy milk"]);
}

#[tokio::test]
async fn local_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let store = local_store(dir.path()).await;
    store.add("Buy milk").await.unwrap();
    store.add("Walk dog").await.unwrap();
    let id = store.list()[1].id.clone();
    store.toggle(&id).await.unwrap();
    let before = store.list();
    drop(store);

    let reopened = local_store(dir.path()).await;
    assert_eq!(reopened.list(), before);
}

#[tokio::test]
async fn remote_changes_reach_other_clients() {
    let url = start_server().await;

    let writer = TodoContext::open(&ClientConfig::remote(url.clone())).await.unwrap();
    let reader = TodoContext::open(&ClientConfig::remote(url)).await.unwrap();
    timeout(TEST_TIMEOUT, reader.loaded()).await.unwrap();

    writer.add_todo("Walk dog").await.unwrap();

    let mut rx = reader.subscribe();
    let state = timeout(TEST_TIMEOUT, rx.wait_for(|s| s.todos.len() == 1))
        .await
        .unwrap()
        .unwrap()
        .clone();
    assert_eq!(texts(&state), vec!["Walk dog"]);
}

#[tokio::test]
async fn http_backend_queries_and_mutates() {
    let backend = HttpBackend::new(&start_server().await).unwrap();
    assert!(backend.get_todos().await.unwrap().is_empty());

    let id = backend.add_todo("Buy milk").await.unwrap();
    let todos = backend.get_todos().await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, id);
    assert_eq!(todos[0].text, "Buy milk");
    assert!(!todos[0].is_completed);

    backend.toggle_todo(&id).await.unwrap();
    backend.update_todo(&id, "Buy oat milk").await.unwrap();
    let todos = backend.get_todos().await.unwrap();
    assert!(todos[0].is_completed);
    assert_eq!(todos[0].text, "Buy oat milk");

    assert_eq!(backend.clear_all_todos().await.unwrap().deleted_count, 1);
    assert!(backend.get_todos().await.unwrap().is_empty());
    assert!(backend.delete_todo(&id).await.unwrap_err().is_not_found());
}
