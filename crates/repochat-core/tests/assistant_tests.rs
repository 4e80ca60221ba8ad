use repochat_core::backend::{Backend, ChatReply};
use repochat_core::error::{RepochatError, Result};
use repochat_core::session::{SessionHandle, SessionStatus, SessionUpdate};
use repochat_core::Assistant;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Recording backend double; answers are canned, failures are toggled.
#[derive(Default)]
struct MockBackend {
    index_calls: Mutex<Vec<PathBuf>>,
    chat_calls: Mutex<Vec<(String, PathBuf)>>,
    answer: Mutex<String>,
    fail_index: AtomicBool,
    fail_chat: AtomicBool,
}

impl MockBackend {
    fn with_answer(answer: &str) -> Arc<Self> {
        let backend = Self::default();
        *backend.answer.try_lock().unwrap() = answer.to_string();
        Arc::new(backend)
    }

    async fn index_calls(&self) -> Vec<PathBuf> {
        self.index_calls.lock().await.clone()
    }

    async fn chat_calls(&self) -> Vec<(String, PathBuf)> {
        self.chat_calls.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Backend for MockBackend {
    async fn index(&self, parent_root: &Path) -> Result<()> {
        self.index_calls.lock().await.push(parent_root.to_path_buf());
        if self.fail_index.load(Ordering::SeqCst) {
            return Err(RepochatError::Server { status: 500 });
        }
        Ok(())
    }

    async fn chat(&self, question: &str, parent_root: &Path) -> Result<ChatReply> {
        self.chat_calls
            .lock()
            .await
            .push((question.to_string(), parent_root.to_path_buf()));
        if self.fail_chat.load(Ordering::SeqCst) {
            return Err(RepochatError::Server { status: 500 });
        }
        Ok(ChatReply {
            answer: self.answer.lock().await.clone(),
            context: Vec::new(),
        })
    }
}

fn assistant_for(backend: Arc<MockBackend>, root: &Path) -> Assistant {
    Assistant::new(backend, vec![root.to_path_buf()])
}

// ========================================================================
// Inline generation
// ========================================================================

#[tokio::test]
async fn trigger_line_issues_exactly_one_chat_call() {
    let backend = MockBackend::with_answer("def add(a,b): return a+b");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);
    let line = "# generate a function that adds two numbers";

    let snippet = assistant.handle_line(line, root).await.unwrap().unwrap();
    assert_eq!(snippet.trigger_line, line);
    assert_eq!(
        backend.chat_calls().await,
        vec![(
            "a function that adds two numbers".to_string(),
            root.to_path_buf()
        )]
    );

    // Identical unchanged line after success never refires.
    let again = assistant.handle_line(line, root).await.unwrap();
    assert!(again.is_none());
    assert_eq!(backend.chat_calls().await.len(), 1);
}

#[tokio::test]
async fn non_trigger_lines_are_ignored() {
    let backend = MockBackend::with_answer("irrelevant");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);

    let result = assistant.handle_line("let x = 1;", root).await.unwrap();
    assert!(result.is_none());
    assert!(backend.chat_calls().await.is_empty());
}

#[tokio::test]
async fn failed_generation_permits_retry() {
    let backend = MockBackend::with_answer("fn id() {}");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);
    let line = "// generate an identity function";

    backend.fail_chat.store(true, Ordering::SeqCst);
    assert!(assistant.handle_line(line, root).await.is_err());

    // The pending claim was reversed, so the same edit fires again.
    backend.fail_chat.store(false, Ordering::SeqCst);
    let snippet = assistant.handle_line(line, root).await.unwrap();
    assert!(snippet.is_some());
    assert_eq!(backend.chat_calls().await.len(), 2);
}

#[tokio::test]
async fn fenced_answers_are_cleaned() {
    let backend = MockBackend::with_answer("```python\ndef add(a,b): return a+b\n```");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);

    let snippet = assistant
        .handle_line("# generate an add function", root)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snippet.body, "def add(a,b): return a+b");
}

// ========================================================================
// File-creation notifier
// ========================================================================

#[tokio::test]
async fn file_creation_indexes_root_and_updates_throttle() {
    let backend = MockBackend::with_answer("answer");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);

    assistant
        .handle_file_created(Path::new("/proj/src/new_module.py"))
        .await;
    assert_eq!(backend.index_calls().await, vec![root.to_path_buf()]);

    // A chat right after must not re-index: the throttle was marked.
    let (session, mut rx) = SessionHandle::channel();
    assistant.handle_question(1, "what changed?", root, &session).await;
    assert_eq!(backend.index_calls().await.len(), 1);

    let first = rx.recv().await.unwrap();
    assert_eq!(
        first,
        SessionUpdate::Status {
            id: 1,
            status: SessionStatus::Thinking
        }
    );
}

#[tokio::test]
async fn file_outside_every_root_is_ignored() {
    let backend = MockBackend::with_answer("answer");
    let assistant = assistant_for(backend.clone(), Path::new("/proj"));

    assistant
        .handle_file_created(Path::new("/elsewhere/scratch.py"))
        .await;
    assert!(backend.index_calls().await.is_empty());
}

#[tokio::test]
async fn failed_creation_index_leaves_throttle_unmarked() {
    let backend = MockBackend::with_answer("answer");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);

    backend.fail_index.store(true, Ordering::SeqCst);
    assistant
        .handle_file_created(Path::new("/proj/lib.rs"))
        .await;

    // Next chat must still attempt the pre-index.
    backend.fail_index.store(false, Ordering::SeqCst);
    let (session, _rx) = SessionHandle::channel();
    assistant.handle_question(1, "q", root, &session).await;
    assert_eq!(backend.index_calls().await.len(), 2);
}

// ========================================================================
// Chat session flow
// ========================================================================

#[tokio::test]
async fn first_question_emits_indexing_thinking_answer() {
    let backend = MockBackend::with_answer("main parses args");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);
    let (session, mut rx) = SessionHandle::channel();

    assistant
        .handle_question(42, "what does main do", root, &session)
        .await;
    drop(session);

    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }
    assert_eq!(
        updates,
        vec![
            SessionUpdate::Status {
                id: 42,
                status: SessionStatus::Indexing
            },
            SessionUpdate::Status {
                id: 42,
                status: SessionStatus::Thinking
            },
            SessionUpdate::Answer {
                id: 42,
                answer: "main parses args".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn second_question_within_window_skips_indexing() {
    let backend = MockBackend::with_answer("answer");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);

    let (session, mut rx) = SessionHandle::channel();
    assistant.handle_question(1, "first", root, &session).await;
    assistant.handle_question(2, "second", root, &session).await;
    drop(session);

    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }

    // One forced index for the first question only.
    assert_eq!(backend.index_calls().await.len(), 1);
    let second: Vec<_> = updates.iter().filter(|u| u.id() == 2).collect();
    assert_eq!(second.len(), 2); // thinking + answer, no indexing
    assert!(matches!(
        second[0],
        SessionUpdate::Status {
            status: SessionStatus::Thinking,
            ..
        }
    ));
}

#[tokio::test]
async fn updates_carry_their_own_question_id() {
    let backend = MockBackend::with_answer("answer");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);

    let (session, mut rx) = SessionHandle::channel();
    let a = session.next_question_id();
    let b = session.next_question_id();
    assert!(b > a);

    assistant.handle_question(a, "first", root, &session).await;
    assistant.handle_question(b, "second", root, &session).await;
    drop(session);

    let mut seen = Vec::new();
    while let Some(update) = rx.recv().await {
        seen.push(update.id());
    }
    assert!(seen.contains(&a));
    assert!(seen.contains(&b));
    assert!(seen.iter().all(|id| *id == a || *id == b));
}

#[tokio::test]
async fn chat_failure_still_resolves_the_session() {
    let backend = MockBackend::with_answer("unused");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);
    backend.fail_chat.store(true, Ordering::SeqCst);

    let (session, mut rx) = SessionHandle::channel();
    assistant.handle_question(9, "q", root, &session).await;
    drop(session);

    let mut last = None;
    while let Some(update) = rx.recv().await {
        last = Some(update);
    }
    match last {
        Some(SessionUpdate::Answer { id, answer }) => {
            assert_eq!(id, 9);
            assert!(answer.contains("HTTP 500"));
        }
        other => panic!("expected answer update, got {other:?}"),
    }
}

#[tokio::test]
async fn index_failure_before_chat_is_not_fatal() {
    let backend = MockBackend::with_answer("still answered");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);
    backend.fail_index.store(true, Ordering::SeqCst);

    let (session, mut rx) = SessionHandle::channel();
    assistant.handle_question(5, "q", root, &session).await;
    drop(session);

    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }
    assert_eq!(
        updates.last(),
        Some(&SessionUpdate::Answer {
            id: 5,
            answer: "still answered".to_string()
        })
    );

    // The failed pre-index must not be recorded as fresh.
    assistant.handle_question(6, "q2", root, &session_noop()).await;
    assert_eq!(backend.index_calls().await.len(), 2);
}

fn session_noop() -> SessionHandle {
    let (session, rx) = SessionHandle::channel();
    drop(rx); // disposed panel: sends become no-ops
    session
}

#[tokio::test]
async fn disposed_session_does_not_break_handlers() {
    let backend = MockBackend::with_answer("answer");
    let root = Path::new("/proj");
    let assistant = assistant_for(backend.clone(), root);

    let session = session_noop();
    assistant.handle_question(1, "q", root, &session).await;
    assert_eq!(backend.chat_calls().await.len(), 1);
}
