//! End-to-end tests driving the application through key presses against an
//! in-memory SQLite database laid out like the graduate records schema.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use rstest::rstest;

use grad_records::ui::{App, Focus, MessageLevel};
use grad_records::{config, DatabaseConnection, GradRecordsClient};

const SCHEMA: &[&str] = &[
    "CREATE TABLE Graduates (Graduation_ID INTEGER PRIMARY KEY, Full_Name TEXT, Year INTEGER, Speciality_ID INTEGER)",
    "CREATE TABLE Specialty (Speciality_ID INTEGER PRIMARY KEY, Name TEXT, Code TEXT)",
    "CREATE TABLE PlaceOfWorks (Work_ID INTEGER PRIMARY KEY, Company TEXT, City TEXT)",
    "CREATE TABLE ScientificSupervisors (Scientific_Director_ID INTEGER PRIMARY KEY, Full_Name TEXT, Degree TEXT)",
    "CREATE TABLE Donations (DONATION_ID INTEGER PRIMARY KEY, Graduation_ID INTEGER, Amount REAL)",
    "INSERT INTO Specialty VALUES (1, 'Physics', '03.03.02')",
    "INSERT INTO Specialty VALUES (2, 'Applied Mathematics', '01.03.04')",
    "INSERT INTO Graduates VALUES (1, 'Ivanov Ivan', 2019, 1)",
    "INSERT INTO Graduates VALUES (2, 'Petrova Anna', 2020, 2)",
];

const CONFIG: &str = r#"
    [database]
    driver = "sqlite"
    url = "sqlite::memory:"
"#;

async fn client() -> GradRecordsClient {
    let conn = DatabaseConnection::in_memory().await.unwrap();
    for sql in SCHEMA {
        conn.execute(sql, &[]).await.unwrap();
    }
    GradRecordsClient::with_connection(config::parse(CONFIG).unwrap(), conn)
}

async fn app_with(table: &str) -> App {
    let mut app = client().await.app();
    app.open_table(table).await;
    assert!(app.message().is_none(), "unexpected message: {:?}", app.message());
    app
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

async fn press(app: &mut App, code: KeyCode) {
    app.handle_key(key(code)).await;
}

async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c)).await;
    }
}

fn keys(app: &App) -> Vec<String> {
    let rows = app.active_tab().unwrap().browser.rows();
    (0..rows.len())
        .filter_map(|i| rows.key_of(i).map(str::to_string))
        .collect()
}

#[tokio::test]
async fn add_record_through_dialog() {
    let mut app = app_with("Specialty").await;

    press(&mut app, KeyCode::Char('a')).await;
    let dialog = app.dialog().expect("dialog open");
    assert_eq!(dialog.form().fields[0].value, "3");
    assert!(dialog.form().fields[0].read_only);

    type_text(&mut app, "Chemistry").await;
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, " 04.03.01 ").await;
    press(&mut app, KeyCode::Enter).await;

    assert!(app.dialog().is_none());
    assert!(app.message().is_none());
    assert_eq!(keys(&app), vec!["1", "2", "3"]);
    assert_eq!(app.active_tab().unwrap().browser.rows().cell(2, 2), "04.03.01");
    assert_eq!(app.status(), "Added record 3");
}

#[tokio::test]
async fn blank_field_keeps_dialog_open() {
    let mut app = app_with("Specialty").await;

    press(&mut app, KeyCode::Char('a')).await;
    type_text(&mut app, "Chemistry").await;
    press(&mut app, KeyCode::Enter).await;

    let message = app.message().expect("warning shown");
    assert_eq!(message.level, MessageLevel::Warning);
    assert_eq!(message.text, "Field 'Code' cannot be empty.");

    // Keys other than dismiss are swallowed while the message is up
    press(&mut app, KeyCode::Char('x')).await;
    press(&mut app, KeyCode::Enter).await;
    assert!(app.message().is_none());

    let dialog = app.dialog().expect("dialog still open");
    assert_eq!(dialog.inputs()[1].lines()[0], "Chemistry");
    assert_eq!(keys(&app).len(), 2);
}

#[tokio::test]
async fn duplicate_add_is_rejected() {
    let mut app = app_with("Specialty").await;

    press(&mut app, KeyCode::Char('a')).await;
    type_text(&mut app, "Physics").await;
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "03.03.02").await;
    press(&mut app, KeyCode::Enter).await;

    let message = app.message().expect("warning shown");
    assert_eq!(message.text, "A record with the same data already exists.");
    assert!(app.dialog().is_some());
    assert_eq!(keys(&app).len(), 2);
}

#[tokio::test]
async fn edit_saves_changes_and_allows_unchanged_row() {
    let mut app = app_with("Specialty").await;

    // Saving the selected row untouched is not a duplicate of itself
    press(&mut app, KeyCode::Char('e')).await;
    assert_eq!(app.dialog().unwrap().form().fields[1].value, "Physics");
    press(&mut app, KeyCode::Enter).await;
    assert!(app.message().is_none());
    assert!(app.dialog().is_none());

    press(&mut app, KeyCode::Char('e')).await;
    for _ in 0.."Physics".len() {
        press(&mut app, KeyCode::Backspace).await;
    }
    type_text(&mut app, "Astrophysics").await;
    press(&mut app, KeyCode::Enter).await;

    assert!(app.dialog().is_none());
    let rows = app.active_tab().unwrap().browser.rows();
    assert_eq!(rows.cell(0, 1), "Astrophysics");
    assert_eq!(app.status(), "Saved record 1");
}

#[tokio::test]
async fn edit_into_existing_row_is_rejected() {
    let mut app = app_with("Specialty").await;
    press(&mut app, KeyCode::Down).await;
    press(&mut app, KeyCode::Enter).await;

    let dialog = app.dialog_mut().unwrap();
    assert_eq!(dialog.form().mode, grad_records::records::FormMode::Edit { key: "2".into() });
    for _ in 0.."Applied Mathematics".len() {
        press(&mut app, KeyCode::Backspace).await;
    }
    type_text(&mut app, "Physics").await;
    press(&mut app, KeyCode::Tab).await;
    for _ in 0.."01.03.04".len() {
        press(&mut app, KeyCode::Backspace).await;
    }
    type_text(&mut app, "03.03.02").await;
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(
        app.message().unwrap().text,
        "A record with the same data already exists."
    );
    assert_eq!(app.active_tab().unwrap().browser.rows().cell(1, 1), "Applied Mathematics");
}

#[tokio::test]
async fn delete_selected_row() {
    let mut app = app_with("Graduates").await;
    press(&mut app, KeyCode::Down).await;
    press(&mut app, KeyCode::Char('d')).await;

    assert!(app.message().is_none());
    assert_eq!(keys(&app), vec!["1"]);
    assert_eq!(app.status(), "Graduates: deleted record 2");
}

#[tokio::test]
async fn actions_on_empty_table_need_selection() {
    let mut app = app_with("Donations").await;

    press(&mut app, KeyCode::Char('d')).await;
    assert_eq!(app.message().unwrap().text, "Select a record first.");
    press(&mut app, KeyCode::Esc).await;

    press(&mut app, KeyCode::Char('e')).await;
    assert_eq!(app.message().unwrap().level, MessageLevel::Warning);
    assert!(app.dialog().is_none());
}

#[tokio::test]
async fn add_to_empty_table_starts_at_one() {
    let mut app = app_with("Donations").await;
    press(&mut app, KeyCode::Char('a')).await;
    assert_eq!(app.dialog().unwrap().form().fields[0].value, "1");
}

#[rstest]
#[case("petrova", 1)]
#[case("20", 2)]
#[case("IVAN", 1)]
#[tokio::test]
async fn search_box_filters_listing(#[case] term: &str, #[case] expected: usize) {
    let mut app = app_with("Graduates").await;

    press(&mut app, KeyCode::Char('/')).await;
    assert_eq!(app.focus(), Focus::Search);
    type_text(&mut app, term).await;
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.focus(), Focus::Browser);
    assert!(app.message().is_none());
    assert_eq!(app.active_tab().unwrap().browser.rows().len(), expected);
}

#[tokio::test]
async fn search_without_hits_reports_nothing_found() {
    let mut app = app_with("Graduates").await;

    press(&mut app, KeyCode::Char('/')).await;
    type_text(&mut app, "Sidorov").await;
    press(&mut app, KeyCode::Enter).await;

    let message = app.message().unwrap();
    assert_eq!(message.level, MessageLevel::Info);
    assert_eq!(message.text, "Nothing found.");
    assert!(app.active_tab().unwrap().browser.rows().is_empty());

    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('r')).await;
    assert_eq!(app.active_tab().unwrap().browser.rows().len(), 2);
    assert_eq!(app.active_tab().unwrap().search_text(), "");
}

#[tokio::test]
async fn navigation_opens_tables_and_show_all() {
    let mut app = client().await.app();
    assert_eq!(app.focus(), Focus::Navigation);

    press(&mut app, KeyCode::Down).await;
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.tabs().len(), 1);
    assert_eq!(app.active_tab().unwrap().browser.table(), "Specialty");
    assert_eq!(app.focus(), Focus::Browser);

    press(&mut app, KeyCode::Tab).await;
    for _ in 0..10 {
        press(&mut app, KeyCode::Down).await;
    }
    press(&mut app, KeyCode::Enter).await;

    let tables: Vec<_> = app.tabs().iter().map(|t| t.browser.table()).collect();
    assert_eq!(
        tables,
        vec!["Specialty", "Graduates", "PlaceOfWorks", "ScientificSupervisors", "Donations"]
    );
    assert!(app.message().is_none());

    press(&mut app, KeyCode::Char('w')).await;
    assert_eq!(app.tabs().len(), 4);
    press(&mut app, KeyCode::Char('q')).await;
    assert!(app.should_quit());
}

#[tokio::test]
async fn catalog_tables_missing_from_database() {
    let conn = DatabaseConnection::in_memory().await.unwrap();
    conn.execute(SCHEMA[0], &[]).await.unwrap();
    let client = GradRecordsClient::with_connection(config::parse(CONFIG).unwrap(), conn);

    assert_eq!(
        client.missing_tables().await.unwrap(),
        vec!["Specialty", "PlaceOfWorks", "ScientificSupervisors", "Donations"]
    );
}

#[tokio::test]
async fn init_connects_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db_config.toml");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("records.db").display());
    std::fs::write(&path, format!("[database]\ndriver = \"sqlite\"\nurl = \"{}\"\n", url)).unwrap();

    let client = grad_records::init(&path).await.unwrap();
    assert_eq!(client.catalog().len(), 5);
    assert_eq!(client.missing_tables().await.unwrap().len(), 5);
    client.close().await;
}

#[tokio::test]
async fn show_all_opens_every_table_despite_failures() {
    let conn = DatabaseConnection::in_memory().await.unwrap();
    for sql in &SCHEMA[1..7] {
        conn.execute(sql, &[]).await.unwrap();
    }
    let client = GradRecordsClient::with_connection(config::parse(CONFIG).unwrap(), conn);
    let mut app = client.app();

    app.open_all().await;

    let tables: Vec<_> = app.tabs().iter().map(|t| t.browser.table()).collect();
    assert_eq!(
        tables,
        vec!["Graduates", "Specialty", "PlaceOfWorks", "ScientificSupervisors", "Donations"]
    );
    assert_eq!(app.message().unwrap().text, "Table 'Graduates' does not exist.");
    assert_eq!(app.tabs()[1].browser.rows().len(), 2);
}
