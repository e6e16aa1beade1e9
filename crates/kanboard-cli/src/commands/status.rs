//! Status command handler

use anyhow::Result;

use kanboard_core::{Collection, Service};

use crate::output::{Output, OutputFormat};

/// Show where the document lives and how much it holds
pub fn show(service: &Service, output: &Output) -> Result<()> {
    let store = service.store();
    let config = store.config();
    let doc = store.document();

    match output.format {
        OutputFormat::Json => {
            let counts: serde_json::Map<String, serde_json::Value> = Collection::ALL
                .iter()
                .map(|c| (c.name().to_string(), doc.len(*c).into()))
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "document_path": config.document_path(),
                    "document_size": store.document_size(),
                    "listen_addr": config.listen_addr,
                    "counts": counts,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.document_path().display());
        }
        OutputFormat::Human => {
            println!("kanboard status");
            println!("===============");
            println!();
            println!("Storage:");
            println!("  Document: {}", config.document_path().display());
            println!("  Size:     {} bytes", store.document_size());
            println!();
            println!("Server:");
            println!("  Listen:   ws://{}", config.listen_addr);
            println!();
            println!("Contents:");
            for collection in Collection::ALL {
                println!("  {:<9} {}", format!("{}:", collection), doc.len(collection));
            }
        }
    }

    Ok(())
}
