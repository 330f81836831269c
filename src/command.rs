//! OS actions behind terminal menu items.

use std::process::{Child, Command as Process, Stdio};

use log::{info, warn};

use crate::config::{PRINTER_QUEUE, PRINTER_USB_PORT, TEST_PAGE_PATH};
use crate::error::{Error, Result};
use crate::ui::menu::Command;

/// Runs the side effect bound to a command. Fire-and-forget: the core
/// never looks at what the action produced.
pub trait CommandDispatcher {
    fn dispatch(&mut self, command: Command) -> Result<()>;
}

/// Program and arguments for one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

/// Printer the printer actions target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrinterTarget {
    pub queue: String,
    pub test_page: String,
    pub usb_port: String,
}

impl Default for PrinterTarget {
    fn default() -> Self {
        Self {
            queue: PRINTER_QUEUE.into(),
            test_page: TEST_PAGE_PATH.into(),
            usb_port: PRINTER_USB_PORT.into(),
        }
    }
}

impl PrinterTarget {
    pub fn invocation(&self, command: Command) -> Invocation {
        let (program, args): (&'static str, Vec<String>) = match command {
            Command::Reboot => ("reboot", vec![]),
            Command::PowerOff => ("poweroff", vec![]),
            Command::PrintTestPage => (
                "lp",
                vec!["-d".into(), self.queue.clone(), self.test_page.clone()],
            ),
            Command::ResumeQueue => ("cupsenable", vec![self.queue.clone()]),
            Command::CancelJobs => ("cancel", vec!["-a".into(), self.queue.clone()]),
            Command::ResetUsb => (
                "sh",
                vec![
                    "-c".into(),
                    format!(
                        "echo {port} > /sys/bus/usb/drivers/usb/unbind; sleep 1; \
                         echo {port} > /sys/bus/usb/drivers/usb/bind",
                        port = self.usb_port
                    ),
                ],
            ),
        };
        Invocation { program, args }
    }
}

/// Spawns each command as a detached child process.
pub struct ShellDispatcher {
    target: PrinterTarget,
    children: Vec<Child>,
}

impl ShellDispatcher {
    pub fn new(target: PrinterTarget) -> Self {
        Self {
            target,
            children: Vec::new(),
        }
    }

    /// Collect children that have exited.
    fn reap(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    warn!("Command: pid {} exited with {}", child.id(), status);
                }
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!("Command: pid {}: {}", child.id(), e);
                false
            }
        });
    }
}

impl CommandDispatcher for ShellDispatcher {
    fn dispatch(&mut self, command: Command) -> Result<()> {
        self.reap();

        let Invocation { program, args } = self.target.invocation(command);
        info!("Command: {:?} -> {} {}", command, program, args.join(" "));
        let child = Process::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|source| Error::Command { program, source })?;
        self.children.push(child);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> PrinterTarget {
        PrinterTarget {
            queue: "Office".into(),
            test_page: "/tmp/page".into(),
            usb_port: "1-1.2".into(),
        }
    }

    #[test]
    fn printer_commands_target_the_queue() {
        let t = target();
        assert_eq!(
            t.invocation(Command::PrintTestPage),
            Invocation {
                program: "lp",
                args: vec!["-d".into(), "Office".into(), "/tmp/page".into()],
            }
        );
        assert_eq!(t.invocation(Command::ResumeQueue).args, vec!["Office".to_string()]);
        assert_eq!(t.invocation(Command::CancelJobs).program, "cancel");
    }

    #[test]
    fn power_commands_take_no_arguments() {
        let t = target();
        for (command, program) in [(Command::Reboot, "reboot"), (Command::PowerOff, "poweroff")] {
            let inv = t.invocation(command);
            assert_eq!(inv.program, program);
            assert!(inv.args.is_empty());
        }
    }

    #[test]
    fn usb_reset_rebinds_the_port() {
        let inv = target().invocation(Command::ResetUsb);
        assert_eq!(inv.program, "sh");
        let script = &inv.args[1];
        assert!(script.contains("echo 1-1.2 > /sys/bus/usb/drivers/usb/unbind"));
        assert!(script.ends_with("echo 1-1.2 > /sys/bus/usb/drivers/usb/bind"));
    }

    #[test]
    fn default_target_uses_configured_printer() {
        let inv = PrinterTarget::default().invocation(Command::PrintTestPage);
        assert_eq!(inv.args[1], PRINTER_QUEUE);
        assert_eq!(inv.args[2], TEST_PAGE_PATH);
    }
}
