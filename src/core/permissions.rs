use super::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Calendar,
    Calls,
    FollowUps,
    Projects,
    Tasks,
    Clients,
    Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Edit,
    Delete,
}

fn is_staff(role: &Role) -> bool {
    matches!(role, Role::Admin | Role::Colaborador)
}

/// Whether `role` is offered `action` in `section` at all. Record-level
/// rules (project creator, call opener, task assignee) narrow this further.
pub fn allows(role: &Role, section: Section, action: Action) -> bool {
    match (section, action) {
        (Section::Users, _) => role.is_admin(),
        (Section::Tasks, Action::Create) => is_staff(role),
        (Section::Tasks, _) => role.is_admin(),
        (Section::Clients, _) => true,
        (Section::Calendar | Section::Calls | Section::FollowUps | Section::Projects, _) => {
            is_staff(role)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATED: [Section; 5] = [
        Section::Calendar,
        Section::Calls,
        Section::FollowUps,
        Section::Projects,
        Section::Tasks,
    ];
    const ACTIONS: [Action; 3] = [Action::Create, Action::Edit, Action::Delete];

    #[test]
    fn guest_gets_no_mutations_on_gated_sections() {
        for section in GATED {
            for action in ACTIONS {
                assert!(!allows(&Role::Convidado, section, action), "{section:?} {action:?}");
                assert!(!allows(&Role::Other("x".into()), section, action));
            }
        }
    }

    #[test]
    fn colaborador_creates_tasks_but_only_admin_edits_them() {
        assert!(allows(&Role::Colaborador, Section::Tasks, Action::Create));
        assert!(!allows(&Role::Colaborador, Section::Tasks, Action::Edit));
        assert!(!allows(&Role::Colaborador, Section::Tasks, Action::Delete));
        assert!(allows(&Role::Admin, Section::Tasks, Action::Delete));
    }

    #[test]
    fn users_are_admin_only() {
        for action in ACTIONS {
            assert!(allows(&Role::Admin, Section::Users, action));
            assert!(!allows(&Role::Colaborador, Section::Users, action));
        }
    }
}
