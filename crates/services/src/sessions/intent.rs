/// User intents a renderer may issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Start,
    SelectChoice(usize),
    Advance,
    Restart,
}
