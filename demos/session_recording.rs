use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use experiment_files::{
    ExperimentPaths, FieldMapping, InputStore, OutputStore, ParticipantId, SettingsStore, vec3_cell,
};

#[derive(Debug, Parser)]
#[command(
    name = "session_recording",
    disable_help_subcommand = true,
    about = "Record a simulated movement session for one participant",
    long_about = "Resolve a timestamped session file under the participant's outputs folder, \
append one movement sample per frame through an explicit field mapping, then read the file \
back and report what was captured."
)]
struct SessionRecordingCli {
    #[arg(value_name = "ROOT", help = "Experiment root folder")]
    root: PathBuf,
    #[arg(value_name = "PARTICIPANT", help = "Numeric participant id")]
    participant: ParticipantId,
    #[arg(long, default_value_t = 120, help = "Number of frames to record")]
    frames: u32,
    #[arg(
        long,
        default_value = "movements",
        help = "Base name of the session record file"
    )]
    base: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct MovementSample {
    time: f32,
    position: [f32; 3],
}

#[derive(Debug, Deserialize)]
struct SessionSettings {
    movement_scale: f32,
}

fn movement_mapping() -> FieldMapping<MovementSample> {
    FieldMapping::new()
        .column("Time", |sample: &MovementSample| sample.time.to_string())
        .column("Position", |sample: &MovementSample| {
            vec3_cell(sample.position)
        })
        .decode_with(|row| {
            Ok(MovementSample {
                time: row.parse("Time")?,
                position: row.vec3("Position")?,
            })
        })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = SessionRecordingCli::parse();
    let paths = ExperimentPaths::new(&cli.root);

    let scale = match SettingsStore::new(paths.clone())
        .read_participant_settings::<SessionSettings>(cli.participant)?
    {
        Some(settings) => {
            println!("settings loaded: movement_scale = {}", settings.movement_scale);
            settings.movement_scale
        }
        None => {
            println!(
                "no settings for participant {}, using movement_scale = 1",
                cli.participant
            );
            1.0
        }
    };

    let outputs = OutputStore::new(paths.clone());
    let mapping = movement_mapping();
    let session = outputs.session_record_path(cli.participant, &cli.base)?;

    for frame in 0..cli.frames {
        let time = frame as f32 / 60.0;
        let sample = MovementSample {
            time,
            position: [
                scale * time.sin(),
                1.6,
                scale * time.cos(),
            ],
        };
        outputs.append_record(&sample, &session, Some(&mapping))?;
    }

    let recorded = InputStore::new(paths)
        .read_records_at::<MovementSample>(&session, Some(&mapping))?
        .map(|samples| samples.len())
        .unwrap_or(0);
    println!("recorded {} samples -> {}", recorded, session.display());
    Ok(())
}
