//! Editierbare Schaltung: Demo-Sitzung ohne Oberfläche.
//!
//! Lädt die Optionen, erzeugt eine zufällige Schaltung, verschiebt sie als
//! Selektion und prüft Undo/Redo gegen die Schlüsselzustände.

use anyhow::{ensure, Context};
use editable_circuit::app::mouse_tool::{SelectAreaTool, SelectMoveTool};
use editable_circuit::{
    add_random_circuit, EngineOptions, Modifier, ModifierConfig, MouseTool, SelectionFunction,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> anyhow::Result<()> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!(
            "Editierbare Schaltung v{} startet...",
            env!("CARGO_PKG_VERSION")
        );

        let config_path = EngineOptions::config_path();
        let options = EngineOptions::load_from_file(&config_path);
        if std::env::args().any(|arg| arg == "--write-config") {
            options
                .save_to_file(&config_path)
                .context("Optionen konnten nicht gespeichert werden")?;
        }

        Self::session(&options)
    }

    fn session(options: &EngineOptions) -> anyhow::Result<()> {
        let mut modifier = Modifier::new(ModifierConfig::from(options));
        let mut rng = StdRng::seed_from_u64(options.random.seed);

        let stats = add_random_circuit(&mut modifier, &mut rng, &options.random);
        log::info!(
            "Zufallsschaltung: {} Logikelemente, {} Dekorationen, {} Leitungssegmente",
            stats.logicitems,
            stats.decorations,
            stats.wire_segments
        );
        modifier.validate()?;
        let inserted = modifier.layout_key_state();

        // gesamte Schaltung auswählen und verschieben
        let min = f32::from(options.random.grid_min) - 1.0;
        let max = f32::from(options.random.grid_max) + 1.0;
        let gestures = [
            (
                MouseTool::SelectArea(SelectAreaTool::new(SelectionFunction::Add, false)),
                Vec2::splat(min),
                Vec2::splat(max),
            ),
            (
                MouseTool::SelectMove(SelectMoveTool::new()),
                Vec2::ZERO,
                Vec2::new(3.0, 2.0),
            ),
        ];
        for (mut tool, from, to) in gestures {
            log::info!("Geste: {}", tool.name());
            tool.press(&mut modifier, from);
            tool.drag(&mut modifier, to);
            tool.release(&mut modifier, to);
        }
        modifier.validate()?;
        let moved = modifier.layout_key_state();

        let mut undone = 0;
        while modifier.undo_groups_count() > 1 {
            modifier.undo_group();
            undone += 1;
        }
        ensure!(
            modifier.layout_key_state() == inserted,
            "Undo stellt den Ausgangszustand nicht wieder her"
        );
        for _ in 0..undone {
            modifier.redo_group();
        }
        ensure!(
            modifier.layout_key_state() == moved,
            "Redo stellt den verschobenen Zustand nicht wieder her"
        );
        modifier.validate()?;

        log::info!(
            "Sitzung beendet: {} Undo-Gruppen, {} Segmente",
            modifier.undo_groups_count(),
            modifier.layout().segment_count()
        );
        Ok(())
    }
}
