// Output formatting and styling

use colored::Colorize;

use volunteer_application::dto::{ActivityView, TaskView};
use volunteer_domain::value_objects::{ActivityStatus, TaskStatus};

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn status_label(&self, status: ActivityStatus) -> String {
        let label = status.as_str();
        if !self.use_colors {
            return label.to_string();
        }
        match status {
            ActivityStatus::Upcoming => label.blue().to_string(),
            ActivityStatus::Ongoing => label.yellow().to_string(),
            ActivityStatus::Completed => label.green().to_string(),
        }
    }

    fn task_marker(&self, status: TaskStatus) -> &'static str {
        match status {
            TaskStatus::Pending => "[ ]",
            TaskStatus::InProgress => "[~]",
            TaskStatus::Completed => "[x]",
        }
    }

    /// Multi-line summary of an activity
    pub fn activity(&self, view: &ActivityView) -> String {
        let mut out = self.header(&format!("#{} {}", view.id, view.title));
        if !view.organization_name.is_empty() {
            out.push_str(&format!("\n  by {}", view.organization_name));
        }

        let overridden = if view.progress_overridden { " (set manually)" } else { "" };
        out.push_str(&format!(
            "\n  status: {}  progress: {}{}",
            self.status_label(view.status),
            view.progress,
            overridden
        ));

        let seats = match view.max_participants {
            Some(max) => format!("{}/{}", view.participant_count, max),
            None => view.participant_count.to_string(),
        };
        let joined = if view.is_joined { ", you joined" } else { "" };
        out.push_str(&format!("\n  participants: {}{}", seats, joined));

        if view.tasks.is_empty() {
            out.push_str("\n  no tasks");
        }
        for task in &view.tasks {
            out.push('\n');
            out.push_str(&self.task_line(task));
        }
        out
    }

    fn task_line(&self, task: &TaskView) -> String {
        let mut line = format!("  {} {} {}", self.task_marker(task.status), task.id, task.title);
        if let Some(hours) = task.total_hours {
            line.push_str(&format!(" ({}h)", hours));
        }
        if !task.assignees.is_empty() {
            let ids: Vec<String> = task.assignees.iter().map(ToString::to_string).collect();
            line.push_str(&format!(" -> {}", ids.join(", ")));
        }
        line
    }
}

/// Print error message to stderr
pub fn print_error(msg: &str) {
    eprintln!("{}", OutputStyle::default().error(msg));
}

/// Print success message to stdout
pub fn print_success(msg: &str) {
    println!("{}", OutputStyle::default().success(msg));
}

#[cfg(test)]
mod tests {
    use super::*;
    use volunteer_domain::services::{ActivityPermissions, TaskPermissions};
    use volunteer_domain::value_objects::{ActivityId, Progress, TaskId, UserId};

    fn view() -> ActivityView {
        ActivityView {
            id: ActivityId::new(4),
            title: "Soup kitchen".into(),
            organization_name: "Helping Hands".into(),
            start_date: None,
            end_date: None,
            status: ActivityStatus::Ongoing,
            progress: Progress::new(50),
            progress_overridden: true,
            is_public: true,
            is_joined: false,
            participant_count: 3,
            max_participants: Some(8),
            permissions: ActivityPermissions {
                can_edit: false,
                can_add_task: false,
                can_join: true,
                can_leave: false,
                can_set_progress: false,
            },
            tasks: vec![TaskView {
                id: TaskId::new(9),
                title: "Peel potatoes".into(),
                status: TaskStatus::Completed,
                completed: true,
                due_date: None,
                total_hours: Some(2),
                created_by: UserId::new(1),
                assignees: vec![UserId::new(5), UserId::new(6)],
                permissions: TaskPermissions {
                    can_edit: false,
                    can_delete: false,
                    can_change_status: false,
                },
            }],
        }
    }

    #[test]
    fn test_activity_rendering() {
        let text = OutputStyle::plain().activity(&view());
        assert!(text.starts_with("#4 Soup kitchen"));
        assert!(text.contains("status: ongoing  progress: 50% (set manually)"));
        assert!(text.contains("participants: 3/8"));
        assert!(text.contains("[x] 9 Peel potatoes (2h) -> 5, 6"));
    }

    #[test]
    fn test_plain_messages() {
        let style = OutputStyle::plain();
        assert_eq!(style.success("done"), "✓ done");
        assert_eq!(style.warning("careful"), "⚠ careful");
    }
}
