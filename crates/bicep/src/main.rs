use anyhow::Context;
use bicep_errors::Renderer;
use camino::Utf8PathBuf;
use clap::Parser;

#[derive(Parser)]
enum Options {
    /// Parse a file and print its canonical tree.
    Canon { path: Utf8PathBuf },
    /// Parse a file and print its concrete syntax tree.
    Dump { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<()> {
    match Options::parse() {
        Options::Canon { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{path}`"))?;

            let parse = bicep_parse::file(&text)
                .with_context(|| format!("failed to parse `{path}`"))?;

            let renderer = Renderer::styled();
            for diagnostic in parse.errors() {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), &text));
            }

            let canonical = bicep_canon::canonicalize(&parse.syntax())?;

            println!("================================================");
            println!("{path}");
            println!("================================================");
            println!("{text}");
            println!("------------------------------------------------");
            println!("{canonical}");

            Ok(())
        }
        Options::Dump { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{path}`"))?;

            let parse = bicep_parse::file(&text)
                .with_context(|| format!("failed to parse `{path}`"))?;

            let renderer = Renderer::styled();
            for diagnostic in parse.errors() {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), &text));
            }

            print!("{}", parse.syntax().debug_dump());

            Ok(())
        }
    }
}
