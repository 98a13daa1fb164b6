use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use search_core::{
    paginate, process_queries, remove_duplicates, DocId, Document, DocumentStatus, ExecutionPolicy,
    RequestQueue, SearchServer,
};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocId,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Rank documents against plus/minus word queries with TF-IDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Corpus {
    /// JSON Lines file with one {"id", "text", "status", "ratings"} object per line, or "-" for stdin
    #[arg(long)]
    input: String,
    /// Space-separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for a query
    Search {
        #[command(flatten)]
        corpus: Corpus,
        #[arg(long)]
        query: String,
        /// Only rank documents with this status
        #[arg(long, default_value_t = DocumentStatus::Actual)]
        status: DocumentStatus,
        /// Rank on all cores
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Results per printed page
        #[arg(long, default_value_t = 2)]
        page_size: usize,
        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show which query words a document contains
    Match {
        #[command(flatten)]
        corpus: Corpus,
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: DocId,
    },
    /// Remove documents whose word sets repeat an earlier document
    Dedup {
        #[command(flatten)]
        corpus: Corpus,
    },
    /// Run every line of a query file and report empty results
    Batch {
        #[command(flatten)]
        corpus: Corpus,
        /// File with one query per line
        #[arg(long)]
        queries: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, query, status, parallel, page_size, json } => {
            let server = load_server(&corpus)?;
            let policy = if parallel { ExecutionPolicy::Parallel } else { ExecutionPolicy::Sequential };
            let found = server.find_top_documents_with(policy, &query, status)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                print_pages(&found, page_size);
            }
        }
        Commands::Match { corpus, query, id } => {
            let server = load_server(&corpus)?;
            let (words, status) = server.match_document(&query, id)?;
            println!("{{ document_id = {}, status = {}, words = {} }}", id, status, words.join(" "));
        }
        Commands::Dedup { corpus } => {
            let server = load_server(&corpus)?;
            for id in remove_duplicates(&server) {
                println!("Found duplicate document id {id}");
            }
            println!("{} documents left", server.document_count());
        }
        Commands::Batch { corpus, queries, json } => {
            let server = load_server(&corpus)?;
            let queries = read_lines(Path::new(&queries))?;
            run_batch(&server, &queries, json)?;
        }
    }
    Ok(())
}

fn load_server(corpus: &Corpus) -> Result<SearchServer> {
    let server = SearchServer::new(&corpus.stop_words)?;
    let docs = if corpus.input == "-" {
        parse_docs(io::stdin().lock())?
    } else {
        let file = File::open(&corpus.input).with_context(|| format!("opening {}", corpus.input))?;
        parse_docs(BufReader::new(file))?
    };
    for doc in docs {
        server
            .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
            .with_context(|| format!("adding document {}", doc.id))?;
    }
    tracing::info!(num_docs = server.document_count(), "loaded documents");
    Ok(server)
}

fn parse_docs<R: BufRead>(reader: R) -> Result<Vec<InputDoc>> {
    let mut docs = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc =
            serde_json::from_str(&line).with_context(|| format!("line {}", lineno + 1))?;
        docs.push(doc);
    }
    Ok(docs)
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn run_batch(server: &SearchServer, queries: &[String], json: bool) -> Result<()> {
    let (joined, empty) = batch_search(server, queries)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&joined)?);
    } else {
        for doc in &joined {
            println!("{doc}");
        }
    }
    println!("Total empty requests: {empty}");
    Ok(())
}

/// Run the queries once; return every hit in query order and the empty-request count.
fn batch_search(server: &SearchServer, queries: &[String]) -> Result<(Vec<Document>, usize)> {
    let results = process_queries(server, queries)?;
    let mut requests = RequestQueue::new(server);
    for documents in &results {
        requests.record(documents);
    }
    Ok((results.into_iter().flatten().collect(), requests.no_result_requests()))
}

fn print_pages(found: &[Document], page_size: usize) {
    for page in paginate(found, page_size) {
        for doc in page {
            println!("{doc}");
        }
        println!("Page break");
    }
}
