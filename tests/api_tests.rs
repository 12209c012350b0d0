// tests/api_tests.rs

use std::sync::Arc;

use adaptive_tests::{
    config::Config,
    create_router,
    models::question::{Difficulty, Question},
    state::AppState,
    store::memory::MemoryStore,
};

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app(store: Arc<MemoryStore>) -> String {
    let config = Config {
        rust_log: "error".to_string(),
        ..Config::default()
    };

    let state = AppState { store, config };
    let app = create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Fills the bank with `per_bucket` objective questions for every difficulty of each topic.
fn seeded_store(topics: &[&str], per_bucket: usize) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for topic in topics {
        for difficulty in Difficulty::ALL {
            for i in 0..per_bucket {
                store
                    .add_question(Question {
                        id: 0,
                        subject: "physics".to_string(),
                        topic: topic.to_string(),
                        difficulty,
                        question_type: "objective".to_string(),
                        question: format!("{} {} #{}", topic, difficulty, i),
                        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                        correct_answer: "A".to_string(),
                        explanation: Some("Because.".to_string()),
                    })
                    .unwrap();
            }
        }
    }
    Arc::new(store)
}

fn unique_user() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

#[tokio::test]
async fn unknown_path_404() {
    let address = spawn_app(Arc::new(MemoryStore::new())).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn health_check_works() {
    let address = spawn_app(Arc::new(MemoryStore::new())).await;

    let body: serde_json::Value = reqwest::get(&format!("{}/api/health", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn generate_test_returns_requested_count_for_new_user() {
    let address = spawn_app(seeded_store(&["optics", "motion"], 10)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/tests/generate?user_id={}", address, unique_user()))
        .json(&serde_json::json!({
            "topics": ["optics", "motion"],
            "question_count": 20,
            "question_types": ["objective"]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let questions: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(questions.len(), 20);

    // New users are treated as advanced: 1 easy, 3 medium, 6 hard per topic.
    let hard = questions.iter().filter(|q| q["difficulty"] == "hard").count();
    assert_eq!(hard, 12);
    assert!(questions.iter().all(|q| q["id"].as_i64().is_some()));
    assert!(questions.iter().all(|q| q["type"] == "objective"));
}

#[tokio::test]
async fn generate_test_rejects_invalid_config() {
    let address = spawn_app(seeded_store(&["optics"], 5)).await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/tests/generate?user_id={}", address, unique_user());

    let bad_configs = [
        serde_json::json!({ "topics": [], "question_count": 10, "question_types": ["objective"] }),
        serde_json::json!({ "topics": ["optics"], "question_count": 0, "question_types": ["objective"] }),
        serde_json::json!({ "topics": ["optics"], "question_count": 10, "question_types": ["essay"] }),
        serde_json::json!({ "topics": ["optics"], "question_count": 1_000_000, "question_types": ["objective"] }),
        serde_json::json!({ "topics": ["optics"], "question_count": i64::MAX, "question_types": ["objective"] }),
    ];

    for config in bad_configs {
        let response = client.post(&url).json(&config).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 400, "config {} should be rejected", config);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn generate_test_tolerates_missing_topics() {
    let address = spawn_app(seeded_store(&["optics"], 10)).await;
    let client = reqwest::Client::new();

    let questions: Vec<serde_json::Value> = client
        .post(&format!("{}/api/tests/generate?user_id={}", address, unique_user()))
        .json(&serde_json::json!({
            "topics": ["optics", "thermodynamics"],
            "question_count": 20,
            "question_types": ["objective"]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(questions.len(), 10);
    assert!(questions.iter().all(|q| q["topic"] == "optics"));
}

#[tokio::test]
async fn submit_results_tracks_improvement_and_adapts_next_test() {
    let store = seeded_store(&["optics"], 10);
    let address = spawn_app(store.clone()).await;
    let client = reqwest::Client::new();
    let user = unique_user();

    // First attempt: 2 of 10 optics questions right.
    let answers: Vec<serde_json::Value> = (0..10)
        .map(|i| {
            serde_json::json!({
                "topic": "optics",
                "difficulty": "medium",
                "selected_answer": if i < 2 { "A" } else { "B" },
                "correct_answer": "A"
            })
        })
        .collect();

    let response = client
        .post(&format!("{}/api/results", address))
        .json(&serde_json::json!({
            "user_id": user,
            "subject": "physics",
            "questions": answers,
            "score": 70,
            "time_taken": 600
        }))
        .send()
        .await
        .expect("Submit failed");

    assert_eq!(response.status().as_u16(), 201);
    let created: serde_json::Value = response.json().await.unwrap();
    assert!(created["id"].as_i64().is_some());

    // Second attempt on the same subject.
    let response = client
        .post(&format!("{}/api/results", address))
        .json(&serde_json::json!({
            "user_id": user,
            "subject": "physics",
            "questions": [],
            "score": 85,
            "time_taken": 500
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(store.result_count().unwrap(), 2);

    let history: Vec<serde_json::Value> = client
        .get(&format!("{}/api/results/{}?subject=physics", address, user))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["score"], 85);
    assert_eq!(history[0]["improvement"], 15);
    assert_eq!(history[1]["improvement"], 0);
    assert_eq!(history[1]["topic_performance"]["optics"]["correct"], 2);
    assert_eq!(history[1]["topic_performance"]["optics"]["total"], 10);

    // Accuracy 0.2 on optics: next test leans easy (6 easy, 3 medium, 1 hard).
    let questions: Vec<serde_json::Value> = client
        .post(&format!("{}/api/tests/generate?user_id={}", address, user))
        .json(&serde_json::json!({
            "topics": ["optics"],
            "question_count": 10,
            "question_types": ["objective"]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(questions.len(), 10);
    let easy = questions.iter().filter(|q| q["difficulty"] == "easy").count();
    let hard = questions.iter().filter(|q| q["difficulty"] == "hard").count();
    assert_eq!(easy, 6);
    assert_eq!(hard, 1);
}

#[tokio::test]
async fn submit_results_rejects_invalid_payload() {
    let address = spawn_app(Arc::new(MemoryStore::new())).await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/results", address))
        .json(&serde_json::json!({
            "user_id": "",
            "subject": "physics",
            "questions": [],
            "score": 10,
            "time_taken": 5
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);

    for (score, time_taken) in [(i64::MAX, 5), (10, i64::MAX)] {
        let response = client
            .post(&format!("{}/api/results", address))
            .json(&serde_json::json!({
                "user_id": unique_user(),
                "subject": "physics",
                "questions": [],
                "score": score,
                "time_taken": time_taken
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }
}

#[tokio::test]
async fn analytics_and_catalog() {
    let store = seeded_store(&["optics", "motion"], 2);
    let address = spawn_app(store).await;
    let client = reqwest::Client::new();
    let user = unique_user();

    for (score, optics_right) in [(40, false), (60, true)] {
        client
            .post(&format!("{}/api/results", address))
            .json(&serde_json::json!({
                "user_id": user,
                "subject": "physics",
                "questions": [
                    {
                        "topic": "optics",
                        "difficulty": "hard",
                        "selected_answer": if optics_right { "A" } else { "B" },
                        "correct_answer": "A"
                    },
                    {
                        "topic": "motion",
                        "difficulty": "easy",
                        "selected_answer": "A",
                        "correct_answer": "A"
                    }
                ],
                "score": score,
                "time_taken": 40
            }))
            .send()
            .await
            .unwrap();
    }

    let report: serde_json::Value = client
        .get(&format!("{}/api/analytics/{}", address, user))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(report["tests_taken"], 2);
    assert_eq!(report["strengths"], serde_json::json!(["motion"]));
    assert_eq!(report["weaknesses"], serde_json::json!([]));
    assert_eq!(report["difficulty_distribution"]["hard"], 2);
    assert_eq!(report["average_time_per_question"], 20.0);
    assert_eq!(report["prediction"]["predicted_score"], 80.0);

    let subjects: Vec<String> = client
        .get(&format!("{}/api/subjects", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(subjects, vec!["physics".to_string()]);

    let topics: Vec<serde_json::Value> = client
        .get(&format!("{}/api/subjects/physics/topics", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0]["topic"], "motion");
    assert_eq!(topics[0]["question_count"], 6);
}

#[tokio::test]
async fn topic_listing_reports_user_progress() {
    let address = spawn_app(seeded_store(&["optics", "motion"], 2)).await;
    let client = reqwest::Client::new();
    let user = unique_user();

    let questions: Vec<serde_json::Value> = client
        .post(&format!("{}/api/tests/generate?user_id={}", address, user))
        .json(&serde_json::json!({
            "topics": ["optics"],
            "question_count": 3,
            "question_types": ["objective"]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!questions.is_empty());

    let answers: Vec<serde_json::Value> = questions
        .iter()
        .map(|q| {
            serde_json::json!({
                "question_id": q["id"],
                "topic": q["topic"],
                "difficulty": q["difficulty"],
                "selected_answer": "B",
                "correct_answer": q["correct_answer"]
            })
        })
        .collect();

    // Submitting the same answers twice must not double the completed count.
    for _ in 0..2 {
        let response = client
            .post(&format!("{}/api/results", address))
            .json(&serde_json::json!({
                "user_id": user,
                "subject": "physics",
                "questions": answers,
                "score": 0,
                "time_taken": 30
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    let topics: Vec<serde_json::Value> = client
        .get(&format!("{}/api/subjects/physics/topics?user_id={}", address, user))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0]["topic"], "motion");
    assert_eq!(topics[0]["completed_questions"], 0);
    assert_eq!(topics[1]["topic"], "optics");
    assert_eq!(topics[1]["question_count"], 6);
    assert_eq!(topics[1]["completed_questions"], questions.len() as i64);

    let anonymous: Vec<serde_json::Value> = client
        .get(&format!("{}/api/subjects/physics/topics", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(anonymous[1]["completed_questions"], 0);
}
