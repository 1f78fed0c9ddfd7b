use clap::Subcommand;
use stagebell_core::storage::notification_dir;
use stagebell_core::SoundPlayer;

#[derive(Subcommand)]
pub enum SoundsAction {
    /// List available sound files per notification folder
    List,
    /// Create the notification sound folders
    Init,
}

pub fn run(action: SoundsAction) -> Result<(), Box<dyn std::error::Error>> {
    let base = notification_dir()?;
    match action {
        SoundsAction::List => {
            let inventory = SoundPlayer::scan(&base)?;
            println!("notis:");
            for name in &inventory.notis {
                println!("  {name}");
            }
            println!("pause:");
            for name in &inventory.pause {
                println!("  {name}");
            }
        }
        SoundsAction::Init => {
            SoundPlayer::ensure_layout(&base)?;
            println!("created {}", base.display());
        }
    }
    Ok(())
}
