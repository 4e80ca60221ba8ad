use anyhow::{Context, Result};
use repochat_core::{
    detect_trigger, insert_below, Assistant, Backend, HttpBackend, SessionHandle, SessionUpdate,
    Settings, Snippet, WorkspaceWatcher,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

fn build_assistant(settings: &Settings, root: &Path) -> Arc<Assistant> {
    let backend: Arc<dyn Backend> =
        Arc::new(HttpBackend::new().with_base_url(settings.backend.base_url.clone()));
    Arc::new(
        Assistant::new(backend, vec![root.to_path_buf()]).with_reindex_interval(
            Duration::from_secs(settings.index.reindex_interval_secs),
        ),
    )
}

/// One-shot mode: ask, print the answer, exit.
pub async fn run_single_question(settings: &Settings, root: &Path, question: &str) -> Result<()> {
    let assistant = build_assistant(settings, root);
    let (session, mut updates) = SessionHandle::channel();

    let id = session.next_question_id();
    assistant.handle_question(id, question, root, &session).await;
    drop(session);

    while let Some(update) = updates.recv().await {
        match update {
            SessionUpdate::Status { status, .. } => eprintln!("{status}..."),
            SessionUpdate::Answer { answer, .. } => println!("{answer}"),
        }
    }
    Ok(())
}

/// Interactive mode: watch the workspace, read questions and generate-file
/// commands from stdin.
pub async fn run(settings: Settings, root: PathBuf) -> Result<()> {
    let assistant = build_assistant(&settings, &root);

    let (_watcher, mut created_rx) =
        WorkspaceWatcher::watch(std::slice::from_ref(&root), &settings.watch.extensions)
            .context("failed to start workspace watcher")?;

    let notifier = assistant.clone();
    tokio::spawn(async move {
        while let Some(path) = created_rx.recv().await {
            let assistant = notifier.clone();
            tokio::spawn(async move {
                assistant.handle_file_created(&path).await;
            });
        }
    });

    let (session, mut updates) = SessionHandle::channel();
    tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            match update {
                SessionUpdate::Status { id, status } => println!("[{id}] {status}..."),
                SessionUpdate::Answer { id, answer } => println!("[{id}] {answer}"),
            }
        }
    });

    info!(root = %root.display(), backend = %settings.backend.base_url, "repochat ready");
    println!("repochat - type a question, `:gen <file>` to expand generate-comments, `:q` to quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        if line == ":q" || line == ":quit" {
            break;
        }

        if let Some(path) = line.strip_prefix(":gen ") {
            if let Err(err) = generate_for_file(&assistant, &root, Path::new(path.trim()), &mut lines).await
            {
                eprintln!("generation failed: {err}");
            }
            continue;
        }

        // A trigger comment typed directly previews the snippet.
        if detect_trigger(&line).is_some() {
            match assistant.handle_line(&line, &root).await {
                Ok(Some(snippet)) => println!("{}", snippet.body),
                Ok(None) => println!("(already generated for this line)"),
                Err(err) => eprintln!("generation failed: {err}"),
            }
            continue;
        }

        let id = session.next_question_id();
        let assistant = assistant.clone();
        let session = session.clone();
        let root = root.clone();
        tokio::spawn(async move {
            assistant.handle_question(id, &line, &root, &session).await;
        });
    }

    Ok(())
}

/// Expand every new generate-comment in a file, reviewing each snippet on
/// stdin before it is written back.
async fn generate_for_file(
    assistant: &Assistant,
    root: &Path,
    file: &Path,
    input: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    let file = if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    };
    let mut text = std::fs::read_to_string(&file)
        .with_context(|| format!("cannot read {}", file.display()))?;

    let trigger_lines: Vec<String> = text
        .lines()
        .filter(|line| detect_trigger(line).is_some())
        .map(|line| line.to_string())
        .collect();
    if trigger_lines.is_empty() {
        println!("no generate-comments in {}", file.display());
        return Ok(());
    }

    for line in trigger_lines {
        let snippet = match assistant.handle_line(&line, root).await {
            Ok(Some(snippet)) => snippet,
            Ok(None) => continue, // already generated for this exact line
            Err(err) => {
                eprintln!("  {line}: {err}");
                continue;
            }
        };

        if review(&snippet, input).await? {
            text = insert_below(&text, &snippet.trigger_line, &snippet.body);
            std::fs::write(&file, &text)
                .with_context(|| format!("cannot write {}", file.display()))?;
            println!("  accepted");
        } else {
            println!("  rejected");
        }
    }
    Ok(())
}

async fn review(snippet: &Snippet, input: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
    println!("--- {}", snippet.trigger_line);
    println!("{}", snippet.body);
    println!("--- accept? [y/N]");
    let reply = input.next_line().await?.unwrap_or_default();
    Ok(matches!(reply.trim(), "y" | "Y" | "yes"))
}
