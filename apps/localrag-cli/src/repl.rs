//! Interactive question loop used by `localrag ask`.
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use localrag_core::context::preview;
use localrag_pipeline::{Answer, RagService};

/// Sources first, then the answer.
pub fn format_answer(answer: &Answer) -> String {
    let mut out = String::new();
    if !answer.cited.is_empty() {
        out.push_str("\nTop sources used:\n");
        for hit in &answer.cited {
            out.push_str(&format!("- {} (chunk {}): {}\n", hit.chunk.source, hit.chunk.index, preview(&hit.chunk.text)));
        }
    }
    out.push_str(&format!("\nAnswer:\n{}", answer.response.answer));
    out
}

/// Read questions line by line until `exit` (any case) or end of input.
pub async fn run<R>(service: &RagService, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("Local RAG ready. Ask a question (type 'exit' to quit).");
    let mut lines = input.lines();
    loop {
        print!("\nQuestion: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else { break };
        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") {
            break;
        }
        if question.is_empty() {
            continue;
        }
        match service.ask(question).await {
            Ok(answer) => println!("{}", format_answer(&answer)),
            Err(e) => eprintln!("❌ {e}"),
        }
    }
    Ok(())
}
