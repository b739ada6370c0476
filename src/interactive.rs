//! Interactive job assembly for `create-job --stationery`.
//!
//! The workflow is a small state machine over a [`Prompter`], so tests can
//! drive it with scripted input instead of a terminal.

use log::debug;
use std::io::{BufRead, Write};

use crate::console::{Console, Palette};
use crate::error::{AutomapError, Result};
use crate::model::{
    CapabilityDescriptor, Condition, DocumentGroup, FormatDescriptor, JobDescriptor, Setting,
    Target, Variable,
};
use crate::sanitize_file_stem;

pub trait Prompter {
    /// Show a line of text to the operator.
    fn say(&mut self, text: &str) -> Result<()>;

    /// Ask for a line of input. A blank answer yields `default` when given.
    fn ask(&mut self, message: &str, default: Option<&str>) -> Result<String>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.ask(&format!("{message} {suffix}"), None)?;
        if answer.is_empty() {
            return Ok(default);
        }
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Prompter over any line source; end of input cancels the session.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").map_err(|err| AutomapError::io("writing prompt", err))
    }

    fn ask(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        let written = match default {
            Some(default) => write!(self.output, "{message} [{default}]: "),
            None => write!(self.output, "{message}: "),
        };
        written
            .and_then(|()| self.output.flush())
            .map_err(|err| AutomapError::io("writing prompt", err))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|err| AutomapError::io("reading answer", err))?;
        if read == 0 {
            return Err(AutomapError::Cancelled);
        }

        let answer = line.trim();
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer.to_string()),
        }
    }
}

/// What to do with an assembled job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Generate,
    ExportConfig,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    JobInfo,
    Groups,
    Targets,
    Overrides(usize),
    Done,
}

pub struct Assembler<'a, P> {
    prompter: &'a mut P,
    capabilities: &'a CapabilityDescriptor,
    console: Console,
}

impl<'a, P: Prompter> Assembler<'a, P> {
    pub fn new(prompter: &'a mut P, capabilities: &'a CapabilityDescriptor, palette: Palette) -> Self {
        Self {
            prompter,
            capabilities,
            console: Console::new(palette),
        }
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        let line = self.console.palette.cyan(&format!("=== {title} ==="));
        self.prompter.say("")?;
        self.prompter.say(&line)
    }

    /// Walk the operator through job info, groups and targets.
    pub fn run(&mut self, stationery_ref: &str) -> Result<JobDescriptor> {
        let mut job = JobDescriptor::default();
        let mut step = Step::JobInfo;
        loop {
            debug!("interactive step {step:?}");
            step = match step {
                Step::JobInfo => {
                    self.job_info(&mut job, stationery_ref)?;
                    Step::Groups
                }
                Step::Groups => {
                    job.groups = self.groups()?;
                    Step::Targets
                }
                Step::Targets => match self.select_target(job.targets.is_empty())? {
                    Some(target) => {
                        job.targets.push(target);
                        Step::Overrides(job.targets.len() - 1)
                    }
                    None => Step::Done,
                },
                Step::Overrides(idx) => {
                    if let Some(target) = job.targets.get_mut(idx) {
                        self.overrides(target)?;
                        let added = self
                            .console
                            .palette
                            .green(&format!("Added target: {}", target.name));
                        self.prompter.say("")?;
                        self.prompter.say(&format!("  {added}"))?;
                    }
                    if self.prompter.confirm("Add another target?", false)? {
                        Step::Targets
                    } else {
                        Step::Done
                    }
                }
                Step::Done => return Ok(job),
            };
        }
    }

    fn job_info(&mut self, job: &mut JobDescriptor, stationery_ref: &str) -> Result<()> {
        self.heading("Job Configuration")?;
        let name = self
            .prompter
            .ask("Job name (e.g., 'en' for English locale)", Some("job"))?;
        job.name = sanitize_file_stem(&name);
        job.stationery_path = self
            .prompter
            .ask("Stationery path (relative to job file)", Some(stationery_ref))?;
        Ok(())
    }

    fn groups(&mut self) -> Result<Vec<DocumentGroup>> {
        self.heading("Source Documents")?;
        self.prompter.say(
            "Organize your documents into groups (e.g., 'Getting Started', 'Reference').",
        )?;

        let mut groups = Vec::new();
        loop {
            let name = self.prompter.ask("Group name (blank to finish)", None)?;
            if name.is_empty() {
                if groups.is_empty() {
                    let warning = self.console.palette.yellow(
                        "Warning: No groups added. At least one group is recommended.",
                    );
                    self.prompter.say(&warning)?;
                    if !self.prompter.confirm("Continue without groups?", false)? {
                        continue;
                    }
                }
                break;
            }

            self.prompter.say(&format!("  Adding documents to '{name}'"))?;
            self.prompter
                .say("  Enter document paths relative to job file location.")?;
            self.prompter.say("  (Blank line to finish this group)")?;
            let mut documents = Vec::new();
            loop {
                let path = self.prompter.ask("    Document path", None)?;
                if path.is_empty() {
                    break;
                }
                documents.push(path);
            }

            if documents.is_empty() {
                let skipped = self
                    .console
                    .palette
                    .yellow(&format!("Skipped empty group '{name}'"));
                self.prompter.say(&format!("  {skipped}"))?;
            } else {
                let added = self.console.palette.green(&format!(
                    "Added group '{name}' with {} documents",
                    documents.len()
                ));
                self.prompter.say(&format!("  {added}"))?;
                groups.push(DocumentGroup { name, documents });
            }

            if !self.prompter.confirm("Add another group?", true)? {
                break;
            }
        }
        Ok(groups)
    }

    fn find_format(&self, choice: &str) -> Option<&'a FormatDescriptor> {
        let capabilities: &'a CapabilityDescriptor = self.capabilities;
        match choice.parse::<usize>() {
            Ok(number) => number
                .checked_sub(1)
                .and_then(|idx| capabilities.formats.get(idx)),
            Err(_) => capabilities.find_format(choice),
        }
    }

    /// Pick a format and its basic options. `None` once the operator
    /// finishes; an empty answer is refused while `required`.
    fn select_target(&mut self, required: bool) -> Result<Option<Target>> {
        self.heading("Build Targets")?;
        self.prompter.say("Available formats from Stationery:")?;
        for (idx, format) in self.capabilities.formats.iter().enumerate() {
            self.prompter.say(&format!(
                "  {}. {} ({})",
                idx + 1,
                format.name,
                format.format_type
            ))?;
        }

        let format = loop {
            let choice = self
                .prompter
                .ask("Select format (number or name, blank to finish)", None)?;
            if choice.is_empty() {
                if required {
                    let line = self.console.error_line("At least one target is required.");
                    self.prompter.say(&line)?;
                    continue;
                }
                return Ok(None);
            }
            match self.find_format(&choice) {
                Some(format) => break format,
                None => {
                    let line = self.console.error_line(&format!("Format not found: {choice}"));
                    self.prompter.say(&line)?;
                }
            }
        };

        let configuring = self.console.palette.green(&format.name);
        self.prompter
            .say(&format!("  Configuring target: {configuring}"))?;
        let mut target = Target::for_format(format);
        target.build = self.prompter.confirm("  Build this target by default?", true)?;
        target.clean_output = self.prompter.confirm("  Clean output before build?", false)?;
        let deploy = self
            .prompter
            .ask("  Deploy target name (blank for none)", None)?;
        target.deploy_target = (!deploy.is_empty()).then_some(deploy);
        Ok(Some(target))
    }

    fn overrides(&mut self, target: &mut Target) -> Result<()> {
        self.prompter.say("  Configure overrides?")?;
        self.prompter
            .say("    c = conditions, v = variables, s = settings, n = none")?;
        let choice = self.prompter.ask("  Override type", Some("n"))?.to_lowercase();

        if choice.contains('c') {
            self.prompter
                .say("  Adding conditions (name=value format, blank to finish):")?;
            target.conditions = self
                .name_values("    Condition (e.g., OnlineOnly=True)")?
                .into_iter()
                .map(|(name, value)| Condition { name, value })
                .collect();
        }
        if choice.contains('v') {
            self.prompter
                .say("  Adding variables (name=value format, blank to finish):")?;
            target.variables = self
                .name_values("    Variable (e.g., ProductVersion=2025.1)")?
                .into_iter()
                .map(|(name, value)| Variable { name, value })
                .collect();
        }
        if choice.contains('s') {
            self.prompter.say("  Available settings:")?;
            let available = self
                .capabilities
                .find_format(&target.format)
                .map(|format| format.settings.as_slice())
                .unwrap_or_default();
            for setting in available {
                self.prompter.say(&format!(
                    "    - {} (default: \"{}\")",
                    setting.name, setting.default_value
                ))?;
            }
            self.prompter
                .say("  Adding settings (name=value format, blank to finish):")?;
            target.settings = self
                .name_values("    Setting")?
                .into_iter()
                .map(|(name, value)| Setting { name, value })
                .collect();
        }
        Ok(())
    }

    /// Collect `name=value` lines until a blank one; lines without `=` are
    /// ignored.
    fn name_values(&mut self, message: &str) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        loop {
            let line = self.prompter.ask(message, None)?;
            if line.is_empty() {
                return Ok(pairs);
            }
            if let Some((name, value)) = line.split_once('=') {
                pairs.push((name.trim().to_string(), value.trim().to_string()));
            }
        }
    }
}

/// Final choice after the summary: generate, export the config, or cancel.
pub fn decide<P: Prompter>(prompter: &mut P) -> Result<Decision> {
    let answer = prompter
        .ask(
            "Generate file? (y=generate, e=export config, c=cancel)",
            Some("y"),
        )?
        .to_lowercase();
    Ok(match answer.as_str() {
        "c" => Decision::Cancel,
        "e" => Decision::ExportConfig,
        _ => Decision::Generate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormatSetting;
    use std::io::Cursor;

    fn capabilities() -> CapabilityDescriptor {
        CapabilityDescriptor {
            formats: vec![
                FormatDescriptor {
                    name: "Alpha".to_string(),
                    target_name: "A".to_string(),
                    format_type: "Application".to_string(),
                    settings: vec![FormatSetting {
                        name: "x".to_string(),
                        default_value: "1".to_string(),
                    }],
                    ..FormatDescriptor::default()
                },
                FormatDescriptor {
                    name: "Beta".to_string(),
                    target_name: "B".to_string(),
                    format_type: "Application".to_string(),
                    ..FormatDescriptor::default()
                },
            ],
            ..CapabilityDescriptor::default()
        }
    }

    fn script(lines: &[&str]) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        let mut input = lines.join("\n");
        input.push('\n');
        LinePrompter::new(Cursor::new(input.into_bytes()), Vec::new())
    }

    fn assemble(prompter: &mut LinePrompter<Cursor<Vec<u8>>, Vec<u8>>) -> Result<JobDescriptor> {
        let caps = capabilities();
        Assembler::new(prompter, &caps, Palette::plain()).run("project.wxsp")
    }

    #[test]
    fn scripted_session_builds_expected_job() {
        let mut prompter = script(&[
            "en us",
            "",
            "Intro",
            "a.md",
            "b.md",
            "",
            "",
            "Empty",
            "",
            "n",
            "9",
            "beta",
            "",
            "y",
            "Prod",
            "cv",
            "Online=True",
            "junk",
            "",
            "Ver=2",
            "",
            "",
        ]);
        let job = assemble(&mut prompter).unwrap();

        assert_eq!(job.name, "en_us");
        assert_eq!(job.stationery_path, "project.wxsp");
        assert_eq!(
            job.groups,
            vec![DocumentGroup {
                name: "Intro".to_string(),
                documents: vec!["a.md".to_string(), "b.md".to_string()],
            }]
        );
        assert_eq!(job.targets.len(), 1);
        let target = &job.targets[0];
        assert_eq!(target.name, "B");
        assert_eq!(target.format, "Beta");
        assert!(target.build);
        assert!(target.clean_output);
        assert_eq!(target.deploy_target.as_deref(), Some("Prod"));
        assert_eq!(
            target.conditions,
            vec![Condition {
                name: "Online".to_string(),
                value: "True".to_string(),
            }]
        );
        assert_eq!(target.variables.len(), 1);
        assert!(target.settings.is_empty());

        let transcript = String::from_utf8(prompter.into_output()).unwrap();
        assert!(transcript.contains("Format not found: 9"));
        assert!(transcript.contains("Skipped empty group 'Empty'"));
    }

    #[test]
    fn target_is_required_and_settings_are_listed() {
        let mut prompter = script(&[
            "", "", "", "", "", "y", "", "1", "n", "", "", "s", "x=5", "", "n",
        ]);
        let job = assemble(&mut prompter).unwrap();

        assert_eq!(job.name, "job");
        assert!(job.groups.is_empty());
        let target = &job.targets[0];
        assert_eq!(target.format, "Alpha");
        assert!(!target.build);
        assert_eq!(target.deploy_target, None);
        assert_eq!(
            target.settings,
            vec![Setting {
                name: "x".to_string(),
                value: "5".to_string(),
            }]
        );

        let transcript = String::from_utf8(prompter.into_output()).unwrap();
        assert!(transcript.contains("At least one target is required."));
        assert!(transcript.contains("    - x (default: \"1\")"));
    }

    #[test]
    fn end_of_input_cancels() {
        let mut prompter = LinePrompter::new(Cursor::new(b"en\n".to_vec()), Vec::new());
        assert!(matches!(assemble(&mut prompter), Err(AutomapError::Cancelled)));
    }

    #[test]
    fn decision_defaults_to_generate() {
        let mut prompter = script(&["", "e", "C"]);
        assert_eq!(decide(&mut prompter).unwrap(), Decision::Generate);
        assert_eq!(decide(&mut prompter).unwrap(), Decision::ExportConfig);
        assert_eq!(decide(&mut prompter).unwrap(), Decision::Cancel);
    }
}
