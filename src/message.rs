use chrono::NaiveDate;

use gestao::core::call::{CallOrder, FollowUpKind};
use gestao::core::status::{CallStatus, Priority, ProjectStatus, TaskStatus};
use gestao::core::user::Role;
use gestao::pages::Notice;
use gestao::pages::appointments::CalendarMode;
use gestao::pages::layout::Route;
use gestao::pages::tasks::TaskSort;

use crate::views::{Finished, InputField};

#[derive(Debug, Clone)]
pub enum Message {
    // Shell
    Navigate(Route),
    SessionRestored(Option<Notice>),
    Finished(Box<Finished>),
    Logout,
    CloseDrawer,
    DismissNotice(usize),
    Input(InputField, String),
    AskConfirm(Box<Message>),
    Confirm,
    CancelConfirm,
    OpenUrl(String),

    // Screens
    Login(LoginMsg),
    Projects(ProjectsMsg),
    Project(ProjectDetailMsg),
    Tasks(TasksMsg),
    Calendar(CalendarMsg),
    Clients(ClientsMsg),
    Client(ClientDetailMsg),
    Users(UsersMsg),
    Calls(CallsMsg),
    Call(CallDetailsMsg),
    Accesses(AccessesMsg),
}

impl Message {
    /// Ask before running `self`; used for every delete.
    pub fn confirmed(self) -> Message {
        Message::AskConfirm(Box::new(self))
    }
}

#[derive(Debug, Clone)]
pub enum LoginMsg {
    Email(String),
    Password(String),
    Submit,
}

#[derive(Debug, Clone)]
pub enum ProjectField {
    Name(String),
    Client(Option<i64>),
    Responsible(Option<i64>),
    ToggleAssociated(i64),
    Status(ProjectStatus),
    Description(String),
    Progress(String),
}

#[derive(Debug, Clone)]
pub enum TaskField {
    Title(String),
    Description(String),
    Status(TaskStatus),
    Priority(Priority),
    Project(Option<i64>),
    Assignee(Option<i64>),
}

#[derive(Debug, Clone)]
pub enum ClientField {
    Name(String),
    Document(String),
    Segment(String),
    Email(String),
    Phone(String),
    Owner(String),
}

#[derive(Debug, Clone)]
pub enum ProjectsMsg {
    Search(String),
    StatusFilter(Option<ProjectStatus>),
    ToggleDeadlineSort,
    Page(usize),
    Open(i64),
    New,
    Form(ProjectField),
    Create,
}

#[derive(Debug, Clone)]
pub enum ProjectDetailMsg {
    Edit,
    Form(ProjectField),
    Save,
    Delete,
    NewTask,
    EditTask(i64),
    TaskForm(TaskField),
    /// `None` creates a task, `Some` saves the task being edited.
    SaveTask(Option<i64>),
    DeleteTask(i64),
    CompleteTask(i64),
}

#[derive(Debug, Clone)]
pub enum TasksMsg {
    Search(String),
    StatusFilter(Option<TaskStatus>),
    PriorityFilter(Option<Priority>),
    Sort(TaskSort),
    Page(usize),
    Click(i64),
    New,
    Edit(i64),
    Form(TaskField),
    Save,
    Delete(i64),
}

#[derive(Debug, Clone)]
pub enum AppointmentField {
    Title(String),
    Description(String),
    Local(String),
    User(Option<i64>),
    Client(Option<i64>),
    Project(Option<i64>),
}

#[derive(Debug, Clone)]
pub enum CalendarMsg {
    Mode(CalendarMode),
    Prev,
    Next,
    Today,
    SelectDay(NaiveDate),
    UserFilter(Option<i64>),
    New(NaiveDate),
    Edit(i64),
    Form(AppointmentField),
    Save,
    Delete(i64),
    OpenReschedule(i64),
    Reschedule(i64),
    OpenCopy(i64),
    Copy(i64),
    OpenCopyDay,
    CopyDay,
    OpenCopyRange,
    CopyRange,
}

#[derive(Debug, Clone)]
pub enum ClientsMsg {
    Search(String),
    Open(i64),
    New,
    Form(ClientField),
    Create,
}

#[derive(Debug, Clone)]
pub enum ClientDetailMsg {
    Search(String),
    Page(usize),
    Toggle(String),
    ExpandAll,
    CollapseAll,
    MoveCard(usize, usize),
    NewCard,
    NewCardName(String),
    NewFieldName(String),
    NewFieldValue(String),
    CreateCard,
    OpenRename(String),
    Rename(String),
    DeleteCard(String),
    AddField(String),
    EditField(i64),
    EditorCard(String),
    EditorField(String),
    EditorValue(usize, String),
    AddValue,
    RemoveValue(usize),
    SaveField,
    DeleteField(i64),
    EditClient,
    Form(ClientField),
    SaveClient,
    DeleteClient,
}

#[derive(Debug, Clone)]
pub enum UserField {
    Name(String),
    Email(String),
    Password(String),
    Role(Role),
    Contact(String),
    Position(String),
    Admission(String),
}

#[derive(Debug, Clone)]
pub enum UsersMsg {
    New,
    Edit(i64),
    Form(UserField),
    Save,
    Delete(i64),
}

#[derive(Debug, Clone)]
pub enum CallField {
    Title(String),
    Description(String),
    Priority(Priority),
    Status(CallStatus),
    Client(Option<i64>),
    Assignee(Option<i64>),
}

#[derive(Debug, Clone)]
pub enum CallsMsg {
    Search(String),
    SubmitSearch,
    Status(Option<CallStatus>),
    Priority(Option<Priority>),
    Order(Option<CallOrder>),
    Reset,
    Page(u32),
    Open(i64),
    New,
    Edit(i64),
    Form(CallField),
    Save,
    Delete(i64),
}

#[derive(Debug, Clone)]
pub enum CallDetailsMsg {
    Description(String),
    Kind(FollowUpKind),
    AddFollowUp,
    StartEdit(i64),
    EditDescription(String),
    EditKind(FollowUpKind),
    SaveEdit,
    Delete(i64),
    EditCall,
    CallForm(CallField),
    SaveCall,
}

#[derive(Debug, Clone)]
pub enum AccessesMsg {
    Search(String),
    Page(usize),
    OpenClient(i64),
}
