/// WF3D Terminal - script interpreter for the wf3d engine
///
/// Runs scripts of drawing commands against an edge matrix, a polygon
/// matrix and a transform stack, then rasterizes them to a PPM file or to
/// the terminal.
use log::{debug, info, warn};
use nalgebra::Point3;
use std::io::Write;
use wf3d_core::{Image, Matrix, Transform, TransformStack};

pub mod config;
pub mod renderer;
pub mod script;

pub use config::Config;
pub use renderer::TerminalRenderer;
pub use script::{Command, ScriptError, Statement};

/// What to do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Outcome of running a script
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    pub skipped: usize,
}

/// Owns the drawing state a script mutates.
///
/// The current transform is the top of `transforms`. No script keyword
/// pushes or pops frames; `push_transform` and `pop_transform` are there for
/// callers that want scoped transforms.
pub struct Interpreter<W: Write> {
    config: Config,
    edges: Matrix,
    polygons: Matrix,
    transforms: TransformStack,
    image: Image,
    renderer: TerminalRenderer,
    out: W,
}

impl<W: Write> Interpreter<W> {
    /// `out` receives `display` output
    pub fn new(config: Config, out: W) -> Self {
        let image = Image::with_background(config.width, config.height, config.background);
        Self {
            config,
            edges: Matrix::points(),
            polygons: Matrix::points(),
            transforms: TransformStack::default(),
            image,
            renderer: TerminalRenderer::for_terminal(),
            out,
        }
    }

    pub fn with_renderer(mut self, renderer: TerminalRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn edges(&self) -> &Matrix {
        &self.edges
    }

    pub fn polygons(&self) -> &Matrix {
        &self.polygons
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Current transform
    pub fn transform(&self) -> wf3d_core::Result<&Matrix> {
        self.transforms.peek()
    }

    /// Open a nested frame starting from a copy of the current transform
    pub fn push_transform(&mut self) -> wf3d_core::Result<()> {
        self.transforms.push_copy()
    }

    /// Close the innermost frame, restoring the one below
    pub fn pop_transform(&mut self) -> wf3d_core::Result<Matrix> {
        self.transforms.pop()
    }

    /// Parse and run a script. Bad commands are logged and skipped; `quit`
    /// stops early.
    pub fn run_source(&mut self, source: &str) -> RunSummary {
        let mut summary = RunSummary::default();
        for statement in script::parse(source) {
            let statement = match statement {
                Ok(statement) => statement,
                Err(e) => {
                    warn!("Skipping command: {}", e);
                    summary.skipped += 1;
                    continue;
                }
            };

            debug!("line {}: {:?}", statement.line, statement.command);
            match self.execute(&statement.command) {
                Ok(flow) => {
                    summary.executed += 1;
                    if flow == Flow::Quit {
                        info!("quit at line {}", statement.line);
                        break;
                    }
                }
                Err(source) => {
                    let e = ScriptError::Engine {
                        line: statement.line,
                        source,
                    };
                    warn!("Skipping command: {}", e);
                    summary.skipped += 1;
                }
            }
        }
        summary
    }

    /// Run one command against the current state
    pub fn execute(&mut self, command: &Command) -> wf3d_core::Result<Flow> {
        let step = self.config.step;

        match command {
            Command::Line(a) => self.edges.add_edge(point(&a[..3]), point(&a[3..]))?,
            Command::Circle(a) => self.edges.add_circle(point(&a[..3]), a[3], step)?,
            Command::Hermite(a) => self.edges.add_hermite(*a, step)?,
            Command::Bezier(a) => self.edges.add_bezier(*a, step)?,
            Command::Box(a) => self.polygons.add_box(point(&a[..3]), a[3], a[4], a[5])?,
            Command::Sphere(a) => self.polygons.add_sphere(point(&a[..3]), a[3], step)?,
            Command::Torus(a) => self.polygons.add_torus(point(&a[..3]), a[3], a[4], step)?,
            Command::Scale(a) => self.transforms.compose(&Transform::scale(a[0], a[1], a[2]))?,
            Command::Move(a) => self.transforms.compose(&Transform::translate(a[0], a[1], a[2]))?,
            Command::Rotate(axis, degrees) => {
                self.transforms.compose(&Transform::rotate(*axis, *degrees))?
            }
            Command::Ident => self.transforms.reset_top()?,
            Command::Apply => {
                let transform = self.transforms.peek()?;
                self.edges.apply(transform)?;
                self.polygons.apply(transform)?;
            }
            Command::Clear => {
                self.edges.clear();
                self.polygons.clear();
            }
            Command::Display => {
                self.render()?;
                self.renderer.draw(&self.image, &mut self.out)?;
            }
            Command::Save(path) => {
                self.render()?;
                self.image.save_ppm(path)?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Redraw the image from the current edges and polygons
    fn render(&mut self) -> wf3d_core::Result<()> {
        self.image.clear();
        self.image.draw_lines(&self.edges, self.config.edge_color)?;
        self.image.draw_polygons(&self.polygons, self.config.polygon_color)?;
        Ok(())
    }
}

fn point(a: &[f64]) -> Point3<f64> {
    Point3::new(a[0], a[1], a[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use test_log::test;
    use wf3d_core::Color;

    fn interpreter() -> Interpreter<Vec<u8>> {
        let config = Config {
            width: 20,
            height: 20,
            ..Config::default()
        };
        Interpreter::new(config, Vec::new()).with_renderer(TerminalRenderer::new(20, 10))
    }

    #[test]
    fn test_save_writes_rendered_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("line.ppm");
        let mut interp = interpreter();

        let summary = interp.run_source(&format!("line\n0 0 0 5 0 0\nsave\n{}\n", path.display()));
        assert_eq!(summary, RunSummary { executed: 2, skipped: 0 });

        let image = Image::load_ppm(&path).unwrap();
        assert_eq!(image.width(), 20);
        assert_eq!(image.painted(), 6);
        assert_eq!(image.get(5, 0), Some(Color::RED));
        assert_eq!(image.get(6, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_bad_commands_are_skipped() {
        let mut interp = interpreter();
        let summary = interp.run_source(
            "line\n0 0 0 1 1 1\nline\n1 2\nsphere\n0 0 0 -5\nwobble\nline\n2 2 2 3 3 3\n",
        );
        assert_eq!(summary, RunSummary { executed: 2, skipped: 3 });
        assert_eq!(interp.edges().cols(), 4);
        assert!(interp.polygons().is_empty());
    }

    #[test]
    fn test_commands_compose_newest_first() {
        let mut interp = interpreter();
        interp.run_source("line\n1 0 0 1 0 0\nmove\n10 0 0\nscale\n2 2 2\napply\n");
        assert_eq!(interp.edges().point(0), Point3::new(12.0, 0.0, 0.0));
    }

    #[test]
    fn test_ident_and_clear() {
        let mut interp = interpreter();
        interp.run_source("rotate\nz 90\nident\nbox\n0 5 0 5 5 5\nline\n0 0 0 1 1 1\napply\n");
        assert_eq!(interp.transform().unwrap(), &Transform::identity());
        assert_eq!(interp.polygons().cols(), 36);
        assert_eq!(interp.polygons().point(0), Point3::new(0.0, 5.0, 0.0));

        interp.run_source("clear\n");
        assert!(interp.edges().is_empty());
        assert!(interp.polygons().is_empty());
    }

    #[test]
    fn test_display_draws_to_output() {
        let mut interp = interpreter();
        interp.run_source("box\n2 12 0 8 8 8\ndisplay\n");
        let text = String::from_utf8(interp.output().clone()).unwrap();
        assert_eq!(text.matches('\n').count(), 10);
        assert!(text.contains("48;2;0;0;255"));
        assert_eq!(interp.image().get(5, 8), Some(Color::BLUE));
    }

    #[test]
    fn test_non_finite_arguments_leave_state_alone() {
        let mut interp = interpreter();
        let summary = interp.run_source("scale\nnan 1 1\nline\ninf 0 0 1 1 0\napply\n");
        assert_eq!(summary, RunSummary { executed: 1, skipped: 2 });
        assert_eq!(interp.transform().unwrap(), &Transform::identity());
        assert!(interp.edges().is_empty());
    }

    #[test]
    fn test_demo_scene_stays_in_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.ppm");
        let source = include_str!("../scripts/demo.mdl")
            .replace("demo.ppm", &path.display().to_string());

        let mut interp = Interpreter::new(Config::default(), Vec::new())
            .with_renderer(TerminalRenderer::new(20, 10));
        let summary = interp.run_source(&source);
        assert_eq!(summary.skipped, 0);

        let in_frame = |m: &Matrix| {
            (0..m.cols()).all(|i| {
                let p = m.point(i);
                (0.0..=500.0).contains(&p.x) && (0.0..=500.0).contains(&p.y)
            })
        };
        assert!(in_frame(interp.edges()));
        assert!(in_frame(interp.polygons()));

        // the torus comes first and is centered on the image after the tilt
        let torus_columns = 3 * 2 * 100 * 100;
        let sum = (0..torus_columns).fold((0.0, 0.0), |(x, y), i| {
            let p = interp.polygons().point(i);
            (x + p.x, y + p.y)
        });
        let n = torus_columns as f64;
        assert!((sum.0 / n - 250.0).abs() < 1e-6);
        assert!((sum.1 / n - 250.0).abs() < 1e-6);

        let image = Image::load_ppm(&path).unwrap();
        assert!(image.painted() > 0);
    }

    #[test]
    fn test_quit_stops_processing() {
        let mut interp = interpreter();
        let summary = interp.run_source("quit\nline\n0 0 0 1 1 1\n");
        assert_eq!(summary, RunSummary { executed: 1, skipped: 0 });
        assert!(interp.edges().is_empty());
    }

    #[test]
    fn test_scoped_transforms() {
        let mut interp = interpreter();
        interp.run_source("move\n5 0 0\n");
        let outer = interp.transform().unwrap().clone();

        interp.push_transform().unwrap();
        interp.run_source("scale\n3 3 3\n");
        assert_ne!(interp.transform().unwrap(), &outer);

        interp.pop_transform().unwrap();
        assert_eq!(interp.transform().unwrap(), &outer);

        interp.pop_transform().unwrap();
        let summary = interp.run_source("apply\n");
        assert_eq!(summary.skipped, 1);
    }
}
