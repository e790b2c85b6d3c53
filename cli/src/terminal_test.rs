use super::*;
use crate::config::{ClientConfig, SessionTuning};
use crate::notify::{NotificationKind, NotificationQueue};
use crate::rooms::RoomId;
use crate::test_support::{DEAD_HTTP, DEAD_WS, ScriptedSource};
use tokio::time::{Duration, timeout};

fn offline_session() -> EditingSession {
    let config = ClientConfig::from_parts(Some(DEAD_HTTP.to_owned()), Some(DEAD_WS.to_owned()), SessionTuning::default())
        .expect("test config");
    EditingSession::connect(&config, RoomId::parse("room-1").expect("room id"), ScriptedSource::new(vec![]))
}

async fn drive(session: &mut EditingSession, input: &[u8]) -> String {
    let mut output = Vec::new();
    timeout(Duration::from_secs(5), run(session, input, &mut output))
        .await
        .expect("terminal run timed out")
        .expect("terminal io");
    String::from_utf8(output).expect("utf8 output")
}

#[test]
fn plain_line_types_chars_then_enter() {
    assert_eq!(parse_line("ab"), Command::Type(vec![Key::Char('a'), Key::Char('b'), Key::Enter]));
    assert_eq!(parse_line(""), Command::Type(vec![Key::Enter]));
    assert_eq!(parse_line("x\r"), Command::Type(vec![Key::Char('x'), Key::Enter]));
}

#[test]
fn command_aliases() {
    assert_eq!(parse_line(":tab"), Command::Type(vec![Key::Tab]));
    assert_eq!(parse_line(":accept"), Command::Accept);
    assert_eq!(parse_line(":esc"), Command::Reject);
    assert_eq!(parse_line(":reject"), Command::Reject);
    assert_eq!(parse_line(":show"), Command::Show);
    assert_eq!(parse_line(":home"), Command::Home);
    assert_eq!(parse_line(":quit"), Command::Home);
    assert!(matches!(parse_line(":other"), Command::Type(_)));
}

#[tokio::test(start_paused = true)]
async fn notifications_render_with_sign() {
    let mut queue = NotificationQueue::new(Duration::from_secs(3));
    let joined = queue.enqueue("new user joined", NotificationKind::Success).clone();
    let left = queue.enqueue("User left the room", NotificationKind::Failure).clone();

    assert_eq!(render(&SessionUpdate::Notified(joined), "").as_deref(), Some("+ new user joined"));
    assert_eq!(render(&SessionUpdate::Notified(left), "").as_deref(), Some("- User left the room"));
}

#[test]
fn quiet_updates_render_nothing() {
    assert!(render(&SessionUpdate::SuggestionRequested, "doc").is_none());
    assert!(render(&SessionUpdate::SuggestionDropped, "doc").is_none());
    assert!(render(&SessionUpdate::NotificationsExpired(vec![]), "doc").is_none());
}

#[test]
fn replaced_document_is_printed() {
    let text = render(&SessionUpdate::DocumentReplaced, "print(1)").expect("rendered");
    assert!(text.contains("print(1)"));
}

#[tokio::test]
async fn typed_lines_edit_document_until_home() {
    let mut session = offline_session();
    let output = drive(&mut session, b"abc\n:show\n:home\nignored\n").await;

    assert_eq!(session.document(), "# Code hereabc\n");
    assert!(output.contains("# Code hereabc\n"));
    assert!(output.ends_with("left room\n"));
    assert!(session.is_closed());
}

#[tokio::test]
async fn accept_without_suggestion_leaves_document() {
    let mut session = offline_session();
    drive(&mut session, b":accept\n:home\n").await;

    assert_eq!(session.document(), "# Code here");
}

#[tokio::test]
async fn tab_command_indents_without_suggestion() {
    let mut session = offline_session();
    drive(&mut session, b":tab\n:home\n").await;

    assert_eq!(session.document(), "# Code here    ");
}

#[tokio::test]
async fn end_of_input_closes_session() {
    let mut session = offline_session();
    drive(&mut session, b"x\n").await;

    assert_eq!(session.document(), "# Code herex\n");
    assert!(session.is_closed());
}
