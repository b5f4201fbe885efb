use httpmock::prelude::*;
use modplan::{PlannerError, PlannerSession, RemoteCatalogue, Storage};
use tempfile::TempDir;

fn mock_module(server: &MockServer, code: &str, title: &str, prerequisite: Option<&str>) {
    let mut body = serde_json::json!({
        "title": title,
        "description": format!("{} description", title),
        "moduleCredit": 4
    });
    if let Some(prereq) = prerequisite {
        body["prerequisite"] = serde_json::Value::String(prereq.to_string());
    }
    server.mock(|when, then| {
        when.method(GET).path(format!("/modules/{}.json", code));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    });
}

#[tokio::test]
async fn test_plan_save_and_reload_roundtrip() {
    let server = MockServer::start();
    mock_module(&server, "CS1010", "Programming Methodology", None);
    mock_module(&server, "MA1511", "Engineering Calculus", None);
    mock_module(
        &server,
        "CS2040C",
        "Data Structures and Algorithms",
        Some("CS1010"),
    );

    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");

    {
        let storage = Storage::new(&data_dir);
        let catalogue = RemoteCatalogue::new(server.url(""));
        let mut session = PlannerSession::open(storage, catalogue).await.unwrap();

        session.set_profile("Alex Tan", "ceg", "Y1/S1").unwrap();
        session.add_module("cs1010", 1).await.unwrap();
        session.add_module("MA1511", 1).await.unwrap();
        session.add_module("CS2040C", 2).await.unwrap();
        session.complete_module("CS1010").unwrap();
        session
            .apply_event("CS1010 lecture Mon 10:00 12:00")
            .unwrap();
        session.save().unwrap();
    }

    let storage = Storage::new(&data_dir);
    let catalogue = RemoteCatalogue::new(server.url(""));
    let mut session = PlannerSession::open(storage, catalogue).await.unwrap();

    {
        let student = session.student().unwrap();
        assert_eq!(student.name(), "Alex Tan");
        assert_eq!(student.year(), "Y1/S1");
        assert_eq!(
            student.schedule().module_codes(),
            vec!["CS1010", "MA1511", "CS2040C"]
        );
        assert_eq!(student.schedule().modules_per_sem()[..3], [2, 1, 0]);
        assert!(student.schedule().completion_status("CS1010").unwrap());
        assert!(!student.schedule().completion_status("MA1511").unwrap());
        assert_eq!(student.schedule().semester_of("CS2040C"), Some(2));

        let events = student.timetable().weekly_for("CS1010").unwrap().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].to_save_line("CS1010"), "CS1010 lecture Mon 10:00 12:00");
    }

    // gating still applies to live inserts after a reload
    mock_module(&server, "CS2113", "Software Engineering", Some("CS2040C"));
    let err = session.add_module("CS2113", 2).await.unwrap_err();
    assert!(matches!(err, PlannerError::FailPrereq { .. }));
    session.add_module("CS2113", 3).await.unwrap();
}

#[tokio::test]
async fn test_commands_require_a_profile() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();

    let storage = Storage::new(dir.path().join("data"));
    let catalogue = RemoteCatalogue::new(server.url(""));
    let mut session = PlannerSession::open(storage, catalogue).await.unwrap();

    assert!(session.student().is_none());
    let err = session.add_module("CS1010", 1).await.unwrap_err();
    assert!(matches!(err, PlannerError::MissingProfile));
    let err = session.apply_event("CS1010 lecture Mon 10:00 12:00").unwrap_err();
    assert!(matches!(err, PlannerError::MissingProfile));
}

#[tokio::test]
async fn test_corrupted_schedule_blocks_session_open() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(
        data_dir.join("studentDetails.txt"),
        "Name | Alex\nMajor | CS\nYear | Y1/S1\n",
    )
    .unwrap();
    std::fs::write(data_dir.join("schedule.txt"), "not a schedule\n").unwrap();

    let storage = Storage::new(&data_dir);
    let catalogue = RemoteCatalogue::new(server.url(""));
    let err = PlannerSession::open(storage, catalogue).await.unwrap_err();
    assert!(matches!(err, PlannerError::CorruptedFile { .. }));
}

#[tokio::test]
async fn test_fresh_bootstrap_then_profile_only_session() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");

    {
        let storage = Storage::new(&data_dir);
        let catalogue = RemoteCatalogue::new(server.url(""));
        let mut session = PlannerSession::open(storage, catalogue).await.unwrap();
        session.set_profile("Sam", "CS", "Y2/S2").unwrap();
        session.save().unwrap();
    }

    assert!(data_dir.join("schedule.txt").exists());
    assert!(data_dir.join("studentDetails.txt").exists());
    assert!(data_dir.join("timetable.txt").exists());

    let storage = Storage::new(&data_dir);
    let catalogue = RemoteCatalogue::new(server.url(""));
    let session = PlannerSession::open(storage, catalogue).await.unwrap();
    let student = session.student().unwrap();
    assert_eq!(student.name(), "Sam");
    assert_eq!(student.current_semester(), 4);
    assert!(student.schedule().module_codes().is_empty());
}
