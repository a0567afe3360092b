use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::Parser;

use reading_quiz::client::{ChatApiClient, ClientError, ClientResult, QuizSession, UsernameStore};

/// Terminal front end for the reading quiz.
#[derive(Debug, Parser)]
#[command(name = "quiz-cli", version, about)]
struct Cli {
    /// Base URL of the quiz server
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// File holding the mentor text; prompts on stdin when omitted
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Remember this name and use it for progress tracking
    #[arg(long)]
    login: Option<String>,

    /// Forget the remembered name and exit
    #[arg(long)]
    logout: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        alert(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let store = UsernameStore::default_location();

    if cli.logout {
        if let Some(store) = &store {
            store.clear()?;
        }
        println!("Logged out.");
        return Ok(());
    }

    let username = resolve_username(store.as_ref(), cli.login.as_deref())?;
    let mentor_text = match &cli.text_file {
        Some(path) => fs::read_to_string(path)?,
        None => read_mentor_text()?,
    };

    let client = ChatApiClient::new(&cli.server);
    let mut session = QuizSession::new();

    let locked = session.begin_generation(&mentor_text)?.to_string();
    println!("Generating questions...");
    match client.generate(&locked).await {
        Ok(set) => session.apply_question_set(set)?,
        Err(e) => {
            session.finish_loading();
            return Err(e);
        }
    }

    loop {
        let Some(question) = session.current_question() else {
            break;
        };
        println!(
            "\nQuestion {} of {} (DOK {})\n{}",
            session.current_index() + 1,
            session.question_count(),
            question.dok_level,
            question.question
        );

        let answer = prompt_line("Your answer: ")?;
        let request = match session.evaluation_request(&answer, Some(&username)) {
            Ok(request) => request,
            Err(e @ ClientError::EmptyAnswer) => {
                alert(&e);
                continue;
            }
            Err(e) => return Err(e),
        };

        match client.evaluate(request).await {
            Ok(result) => {
                println!("Score: {}%", result.score_text().trim_end_matches('%'));
                println!("Strengths: {}", result.strengths);
                println!("Gaps: {}", result.gaps);
                println!("Refined version: {}", result.refined_version);
                session.record_feedback(result);
            }
            Err(e) => {
                session.finish_loading();
                alert(&e);
            }
        }

        if !session.next_question() {
            break;
        }
    }

    println!("\nQuiz complete. Nice work, {}!", username);
    Ok(())
}

fn resolve_username(store: Option<&UsernameStore>, login: Option<&str>) -> ClientResult<String> {
    if let Some(name) = login {
        return match store {
            Some(store) => store.save(name),
            None => non_blank(name),
        };
    }

    if let Some(name) = store.map(UsernameStore::load).transpose()?.flatten() {
        return Ok(name);
    }

    loop {
        let name = prompt_line("Enter your name: ")?;
        let saved = match store {
            Some(store) => store.save(&name),
            None => non_blank(&name),
        };
        match saved {
            Ok(name) => return Ok(name),
            Err(e @ ClientError::EmptyUsername) => alert(&e),
            Err(e) => return Err(e),
        }
    }
}

fn non_blank(name: &str) -> ClientResult<String> {
    let name = name.trim();
    if name.is_empty() {
        Err(ClientError::EmptyUsername)
    } else {
        Ok(name.to_string())
    }
}

fn read_mentor_text() -> ClientResult<String> {
    println!("Paste the mentor text, then finish with an empty line:");
    let mut text = String::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            if text.is_empty() {
                continue;
            }
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

fn prompt_line(label: &str) -> ClientResult<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed").into());
    }
    Ok(line.trim_end().to_string())
}

fn alert(error: &ClientError) {
    eprintln!("!! {}", error);
}
