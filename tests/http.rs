use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryResponse {
    id: String,
    user_id: String,
    meal_type: String,
    nutrition: Value,
}

#[derive(Debug, Deserialize)]
struct WaterResponse {
    date: String,
    glasses: u32,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("nutrition_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/goals")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_nutrition_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("NUTRITION_USER_ID", "http-tester")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn lunch(grams: f64) -> Value {
    json!({
        "food": {
            "id": "lentil-soup",
            "name": "Lentil soup",
            "nutritionPer100g": { "calories": 120, "protein": 9, "carbs": 20, "fat": 1, "fiber": 8 }
        },
        "servingSize": { "amount": 1, "unit": "bowl", "grams": grams },
        "mealType": "lunch"
    })
}

async fn today_calories(client: &Client, base_url: &str) -> f64 {
    let today: Value = client
        .get(format!("{base_url}/api/today"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    today["nutrition"]["calories"].as_f64().unwrap_or(0.0)
}

#[tokio::test]
async fn http_entry_lifecycle_updates_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = today_calories(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&lunch(250.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let entry: EntryResponse = response.json().await.unwrap();
    assert_eq!(entry.user_id, "http-tester");
    assert_eq!(entry.meal_type, "lunch");
    assert_eq!(entry.nutrition["calories"].as_f64(), Some(300.0));

    assert_eq!(today_calories(&client, &server.base_url).await, before + 300.0);

    let response = client
        .patch(format!("{}/api/entries/{}", server.base_url, entry.id))
        .json(&json!({ "servingSize": { "amount": 2, "unit": "bowl", "grams": 500 } }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(today_calories(&client, &server.base_url).await, before + 600.0);

    let response = client
        .delete(format!("{}/api/entries/{}", server.base_url, entry.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(today_calories(&client, &server.base_url).await, before);

    let response = client
        .delete(format!("{}/api/entries/{}", server.base_url, entry.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_stats_reject_unknown_window() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/stats?window=yearly", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("unsupported window"));

    let response = client
        .get(format!("{}/api/stats?window=weekly&meal_type=dinner", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn http_onboarding_sets_goals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let goals: Value = client
        .post(format!("{}/api/onboarding", server.base_url))
        .json(&json!({
            "weightKg": 70,
            "heightCm": 175,
            "age": 30,
            "gender": "male",
            "activityLevel": "moderate",
            "goalType": "maintain"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(goals["calories"].as_f64(), Some(2556.0));

    let stored: Value = client
        .get(format!("{}/api/goals", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored, goals);

    let response = client
        .post(format!("{}/api/onboarding", server.base_url))
        .json(&json!({
            "weightKg": -1,
            "heightCm": 175,
            "age": 30,
            "gender": "female",
            "activityLevel": "light",
            "goalType": "lose_weight"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_water_add_and_sub() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: WaterResponse = client
        .get(format!("{}/api/water", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let added: WaterResponse = client
        .post(format!("{}/api/water", server.base_url))
        .json(&json!({ "action": "add" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(added.glasses, before.glasses + 1);
    assert!(!added.date.is_empty());

    let removed: WaterResponse = client
        .post(format!("{}/api/water", server.base_url))
        .json(&json!({ "action": "sub" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed.glasses, before.glasses);

    let response = client
        .post(format!("{}/api/water", server.base_url))
        .json(&json!({ "action": "spill" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_scan_returns_candidates() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let result: Value = client
        .post(format!("{}/api/scan", server.base_url))
        .json(&json!({ "imageUri": "file:///photos/plate.jpg" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let candidates = result["candidates"].as_array().expect("candidates");
    assert_eq!(candidates.len(), 3);
    assert!(candidates[0]["food"]["name"].is_string());
}
