//! Stroke scripts replayed against a drawing surface

use std::path::Path;

use anyhow::{Context, Result};
use painting::{CoordinateMapper, DrawingSurface, GridPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One step of a stroke script
///
/// JSON form: `{"stroke": [[x, y], ...]}`, `"undo"` or `"clear"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptStep {
    /// Press at the first point, drag through the rest, release
    Stroke(Vec<[f32; 2]>),
    Undo,
    Clear,
}

/// What replaying a script did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub steps: usize,
    pub renders: usize,
    pub classify_requests: usize,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stroke script {}", path.display()))?;
    parse_script(&json).with_context(|| format!("Invalid stroke script {}", path.display()))
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>> {
    Ok(serde_json::from_str(json)?)
}

/// Drive the surface exactly as the browser's pointer handlers would
pub fn replay(surface: &mut DrawingSurface, steps: &[ScriptStep]) -> ScriptSummary {
    let mapper = CoordinateMapper::identity(surface.width(), surface.height());
    let map = |[x, y]: [f32; 2]| -> Option<GridPoint> { mapper.map(x, y) };

    let mut summary = ScriptSummary::default();
    for step in steps {
        let responses = match step {
            ScriptStep::Stroke(points) => {
                let Some((&first, rest)) = points.split_first() else {
                    debug!("Skipping empty stroke");
                    continue;
                };
                let mut responses = vec![surface.pointer_down(map(first))];
                responses.extend(rest.iter().map(|&p| surface.pointer_move(map(p))));
                responses.push(surface.pointer_up());
                responses
            }
            ScriptStep::Undo => vec![surface.undo()],
            ScriptStep::Clear => vec![surface.clear()],
        };

        summary.steps += 1;
        summary.renders += responses.iter().filter(|r| r.render).count();
        summary.classify_requests += responses.iter().filter(|r| r.classify).count();
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let steps = parse_script(r#"[{"stroke": [[1, 2], [3.5, 4]]}, "undo", "clear"]"#).unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Stroke(vec![[1.0, 2.0], [3.5, 4.0]]),
                ScriptStep::Undo,
                ScriptStep::Clear,
            ]
        );
        assert!(parse_script(r#"["redo"]"#).is_err());
    }

    #[test]
    fn test_replay_strokes() {
        let mut surface = DrawingSurface::new(64, 64).unwrap();
        let steps = vec![
            ScriptStep::Stroke(vec![[10.0, 10.0], [50.0, 10.0]]),
            ScriptStep::Stroke(vec![[10.0, 40.0]]),
        ];
        let summary = replay(&mut surface, &steps);

        assert_eq!(summary.steps, 2);
        assert_eq!(summary.renders, 3);
        assert_eq!(summary.classify_requests, 2);
        assert_eq!(surface.undo_count(), 2);
        assert_eq!(surface.buffer().get(30, 10), Some(255));
    }

    #[test]
    fn test_replay_undo_and_clear() {
        let mut surface = DrawingSurface::new(64, 64).unwrap();
        let steps = vec![
            ScriptStep::Stroke(vec![[20.0, 20.0]]),
            ScriptStep::Clear,
            ScriptStep::Undo,
        ];
        replay(&mut surface, &steps);
        assert!(!surface.buffer().is_blank());

        replay(&mut surface, &[ScriptStep::Undo, ScriptStep::Undo]);
        assert!(surface.buffer().is_blank());
    }

    #[test]
    fn test_empty_stroke_skipped() {
        let mut surface = DrawingSurface::new(8, 8).unwrap();
        let summary = replay(&mut surface, &[ScriptStep::Stroke(Vec::new())]);
        assert_eq!(summary, ScriptSummary::default());
    }

    #[test]
    fn test_non_finite_point_ends_stroke() {
        let mut surface = DrawingSurface::new(64, 64).unwrap();
        let steps = vec![ScriptStep::Stroke(vec![
            [10.0, 10.0],
            [f32::NAN, 10.0],
            [50.0, 10.0],
        ])];
        replay(&mut surface, &steps);
        // Stroke ended at the bad point; the last move is ignored
        assert_eq!(surface.buffer().get(50, 10), Some(0));
        assert_eq!(surface.buffer().get(10, 10), Some(255));
    }
}
