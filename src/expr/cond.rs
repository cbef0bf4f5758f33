use crate::{
    Ident,
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

impl FormatWriter for Conjunction {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            Conjunction::And => context.writer.write_str("AND"),
            Conjunction::Or => context.writer.write_str("OR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    /// `lhs = rhs` between two column references.
    ColumnEq(Ident, Ident),
    Group(Conditions),
}

impl FormatWriter for ConditionKind {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            ConditionKind::ColumnEq(lhs, rhs) => {
                lhs.format_writer(context)?;
                context.writer.write_str(" = ")?;
                rhs.format_writer(context)
            }
            // a lone condition needs no parentheses
            ConditionKind::Group(group) if group.len() == 1 => group.format_writer(context),
            ConditionKind::Group(group) => {
                context.writer.write_char('(')?;
                group.format_writer(context)?;
                context.writer.write_char(')')
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    conjunction: Conjunction,
    kind: ConditionKind,
}

impl Condition {
    pub fn new(conjunction: Conjunction, kind: ConditionKind) -> Self {
        Self { conjunction, kind }
    }
}

impl FormatWriter for Condition {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        self.kind.format_writer(context)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Conditions(pub(crate) Vec<Condition>);

impl Conditions {
    pub fn push(&mut self, other: Condition) {
        self.0.push(other);
    }

    pub fn push_column_eq(&mut self, conjunction: Conjunction, lhs: Ident, rhs: Ident) {
        self.push(Condition::new(conjunction, ConditionKind::ColumnEq(lhs, rhs)));
    }

    pub fn push_group(&mut self, conjunction: Conjunction, group: Conditions) {
        self.push(Condition::new(conjunction, ConditionKind::Group(group)));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FormatWriter for Conditions {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> std::fmt::Result {
        for (index, condition) in self.0.iter().enumerate() {
            if index > 0 {
                context.writer.write_char(' ')?;
                condition.conjunction.format_writer(context)?;
                context.writer.write_char(' ')?;
            }
            condition.format_writer(context)?;
        }
        Ok(())
    }
}
