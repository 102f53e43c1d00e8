use diary_core::storage::NoteRecord;
use diary_core::NoteStore;

use crate::app::AppContext;
use crate::cli::{ExportArgs, ExportFormat};
use crate::output::{encrypted_record_json, kdf_json};

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    if args.encrypted {
        let salt = store.get_salt()?;
        let records = store
            .list_notes()?
            .iter()
            .map(|summary| store.get_note(summary.id))
            .collect::<diary_core::Result<Vec<NoteRecord>>>()?;
        let notes: Vec<serde_json::Value> = records.iter().map(encrypted_record_json).collect();
        tracing::info!(count = notes.len(), "exporting ciphertext");
        match args.format {
            ExportFormat::Json => {
                let value = serde_json::json!({
                    "params": kdf_json(&salt),
                    "notes": notes,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            // First line carries the KDF parameters, then one note per line.
            ExportFormat::Jsonl => {
                println!("{}", serde_json::to_string(&kdf_json(&salt))?);
                for note in &notes {
                    println!("{}", serde_json::to_string(note)?);
                }
            }
        }
        return Ok(());
    }

    let session = ctx.unlock(&store, false)?;
    let notes = session.export_notes(&store)?;
    tracing::info!(count = notes.len(), "exporting notes");
    match args.format {
        ExportFormat::Json => println!("{}", serde_json::to_string_pretty(&notes)?),
        ExportFormat::Jsonl => {
            for note in &notes {
                println!("{}", serde_json::to_string(note)?);
            }
        }
    }
    Ok(())
}
