//! The interactive command shell.
//!
//! Reads one command per line, writes results to the output sink and
//! complaints to the error sink. The last computed path sticks around so
//! `save` and `print` can act on it.

use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use pedibus_core::geo::format_location;
use pedibus_core::{MultimodalPlanner, NodeId, TripStep};

/// Creates named output sinks for saved paths.
pub trait ResultsFactory {
    fn create(&self, name: &str) -> io::Result<Box<dyn Write>>;
}

/// Results factory writing files into a directory, created on demand.
pub struct DirectoryResults {
    dir: PathBuf,
}

impl DirectoryResults {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ResultsFactory for DirectoryResults {
    fn create(&self, name: &str) -> io::Result<Box<dyn Write>> {
        fs::create_dir_all(&self.dir)?;
        Ok(Box::new(File::create(self.dir.join(name))?))
    }
}

enum LastPath {
    Shortest {
        src: NodeId,
        dst: NodeId,
        miles: f64,
        nodes: Vec<NodeId>,
    },
    Fastest {
        src: NodeId,
        dst: NodeId,
        hours: f64,
        steps: Vec<TripStep>,
    },
}

pub struct CommandShell<F> {
    planner: MultimodalPlanner,
    results: F,
    last_path: Option<LastPath>,
}

impl<F: ResultsFactory> CommandShell<F> {
    pub fn new(planner: MultimodalPlanner, results: F) -> Self {
        Self {
            planner,
            results,
            last_path: None,
        }
    }

    /// Process commands until `exit` or end of input.
    pub fn run(
        &mut self,
        input: impl BufRead,
        mut out: impl Write,
        mut err: impl Write,
    ) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            let mut words = line.split_whitespace();
            let Some(command) = words.next() else {
                continue;
            };
            match command {
                "exit" => break,
                "help" => self.help(&mut out)?,
                "count" => writeln!(out, "{} nodes", self.planner.node_count())?,
                "node" => self.node(words.next(), &mut out, &mut err)?,
                "shortest" => self.shortest(words.next(), words.next(), &mut out, &mut err)?,
                "fastest" => self.fastest(words.next(), words.next(), &mut out, &mut err)?,
                "save" => self.save(&mut out, &mut err)?,
                "print" => self.print(&mut out, &mut err)?,
                unknown => writeln!(err, "Unknown command \"{unknown}\" type help for help.")?,
            }
        }
        Ok(())
    }

    fn help(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "------------------------------------------------------------------------"
        )?;
        writeln!(out, "help     Display this help menu")?;
        writeln!(out, "exit     Exit the program")?;
        writeln!(out, "count    Output the number of nodes in the map")?;
        writeln!(out, "node     Syntax \"node [0, count)\"")?;
        writeln!(out, "         Will output node ID and Lat/Lon for node")?;
        writeln!(out, "fastest  Syntax \"fastest start end\"")?;
        writeln!(
            out,
            "         Calculates the time for fastest path from start to end"
        )?;
        writeln!(out, "shortest Syntax \"shortest start end\"")?;
        writeln!(
            out,
            "         Calculates the distance for the shortest path from start to end"
        )?;
        writeln!(out, "save     Saves the last calculated path to file")?;
        writeln!(out, "print    Prints the steps for the last calculated path")
    }

    fn node(
        &self,
        arg: Option<&str>,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<()> {
        let Some(index) = arg.and_then(|raw| raw.parse::<usize>().ok()) else {
            return writeln!(err, "Invalid node command, see help.");
        };
        match self.planner.sorted_node_by_index(index) {
            Some(node) => writeln!(
                out,
                "Node {index}: id = {} is at {}",
                node.id,
                format_location(node.location)
            ),
            None => writeln!(err, "Invalid node parameter, see help."),
        }
    }

    fn shortest(
        &mut self,
        src: Option<&str>,
        dst: Option<&str>,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<()> {
        let (Some(src), Some(dst)) = (parse_node(src), parse_node(dst)) else {
            return writeln!(err, "Invalid shortest command, see help.");
        };
        match self.planner.shortest_path(src, dst) {
            Some(route) => {
                writeln!(out, "Shortest path is {:.1} mi.", route.miles)?;
                self.last_path = Some(LastPath::Shortest {
                    src,
                    dst,
                    miles: route.miles,
                    nodes: route.nodes,
                });
                Ok(())
            }
            None => writeln!(err, "No path from {src} to {dst}."),
        }
    }

    fn fastest(
        &mut self,
        src: Option<&str>,
        dst: Option<&str>,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<()> {
        let (Some(src), Some(dst)) = (parse_node(src), parse_node(dst)) else {
            return writeln!(err, "Invalid fastest command, see help.");
        };
        match self.planner.fastest_path(src, dst) {
            Some(route) => {
                writeln!(out, "{}", format_travel_time(route.hours))?;
                self.last_path = Some(LastPath::Fastest {
                    src,
                    dst,
                    hours: route.hours,
                    steps: route.steps,
                });
                Ok(())
            }
            None => writeln!(err, "No path from {src} to {dst}."),
        }
    }

    fn save(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        let Some(last) = &self.last_path else {
            return writeln!(err, "No valid path to save, see help.");
        };
        let name = match last {
            LastPath::Shortest {
                src, dst, miles, ..
            } => format!("{src}_{dst}_{miles:.1}mi.csv"),
            LastPath::Fastest {
                src, dst, hours, ..
            } => format!("{src}_{dst}_{hours:.1}hr.csv"),
        };
        let sink = match self.results.create(&name) {
            Ok(sink) => sink,
            Err(_) => return writeln!(err, "Unable to create save file."),
        };

        let mut writer = csv::Writer::from_writer(sink);
        writer
            .write_record(["mode", "node_id"])
            .map_err(io::Error::other)?;
        match last {
            LastPath::Shortest { nodes, .. } => {
                for node in nodes {
                    writer
                        .write_record(["Walk".to_string(), node.to_string()])
                        .map_err(io::Error::other)?;
                }
            }
            LastPath::Fastest { steps, .. } => {
                for step in steps {
                    writer
                        .write_record([step.mode.to_string(), step.node.to_string()])
                        .map_err(io::Error::other)?;
                }
            }
        }
        writer.flush()?;
        writeln!(out, "Path saved to <results>/{name}")
    }

    fn print(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        match &self.last_path {
            None => writeln!(err, "No valid path to print, see help."),
            Some(LastPath::Shortest { miles, .. }) => {
                writeln!(out, "Shortest path is {miles:.1} mi.")
            }
            Some(LastPath::Fastest { steps, .. }) => {
                match self.planner.path_description(steps) {
                    Some(lines) => {
                        for line in lines {
                            writeln!(out, "{line}")?;
                        }
                        Ok(())
                    }
                    None => writeln!(err, "Unable to get path description."),
                }
            }
        }
    }
}

fn parse_node(raw: Option<&str>) -> Option<NodeId> {
    raw.and_then(|token| token.parse().ok())
}

/// `H hr M min S sec` at an hour and above, plain minutes below, zero
/// components elided.
fn format_travel_time(hours: f64) -> String {
    let total_seconds = (hours * 3600.0).round() as u64;
    if total_seconds < 3600 {
        return format!("Fastest path takes {} min.", total_seconds / 60);
    }
    let whole_hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut text = format!("Fastest path takes {whole_hours} hr");
    if minutes > 0 || seconds > 0 {
        text.push_str(&format!(" {minutes} min"));
    }
    if seconds > 0 {
        text.push_str(&format!(" {seconds} sec"));
    }
    text.push('.');
    text
}
