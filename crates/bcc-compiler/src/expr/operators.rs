//! Operator table for the Shunting-Yard engine.
//!
//! Lower precedence numbers bind tighter. `++`/`--` (0) and `$` (2) never
//! reach the operator stack: the compiler emits them as soon as they are
//! seen, so only the remaining operators and `(` are represented here.

use bcc_lexer::TokenKind;

use crate::bytecode::OpCode;

/// An entry on the operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Unary minus.
    Neg,
    BoolNot,
    Places,
    Power,
    Multiply,
    Divide,
    Modulus,
    Plus,
    Minus,
    LShift,
    RShift,
    RelEq,
    RelLe,
    RelGe,
    RelNe,
    RelLt,
    RelGt,
    BoolAnd,
    BoolOr,
    AssignPower,
    AssignMultiply,
    AssignDivide,
    AssignModulus,
    AssignPlus,
    AssignMinus,
    AssignPlaces,
    AssignLShift,
    AssignRShift,
    Assign,
    /// An open parenthesis; a barrier for the pop loop.
    LeftParen,
}

impl Operator {
    /// The operator a token stands for.
    ///
    /// `-` maps to binary [`Operator::Minus`]; the caller decides whether it
    /// is really a negation.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use TokenKind as T;
        let op = match kind {
            T::Bang => Operator::BoolNot,
            T::At => Operator::Places,
            T::Caret => Operator::Power,
            T::Star => Operator::Multiply,
            T::Slash => Operator::Divide,
            T::Percent => Operator::Modulus,
            T::Plus => Operator::Plus,
            T::Minus => Operator::Minus,
            T::LessLess => Operator::LShift,
            T::GreaterGreater => Operator::RShift,
            T::EqualEqual => Operator::RelEq,
            T::LessEqual => Operator::RelLe,
            T::GreaterEqual => Operator::RelGe,
            T::BangEqual => Operator::RelNe,
            T::Less => Operator::RelLt,
            T::Greater => Operator::RelGt,
            T::AmpAmp => Operator::BoolAnd,
            T::PipePipe => Operator::BoolOr,
            T::CaretEqual => Operator::AssignPower,
            T::StarEqual => Operator::AssignMultiply,
            T::SlashEqual => Operator::AssignDivide,
            T::PercentEqual => Operator::AssignModulus,
            T::PlusEqual => Operator::AssignPlus,
            T::MinusEqual => Operator::AssignMinus,
            T::AtEqual => Operator::AssignPlaces,
            T::LessLessEqual => Operator::AssignLShift,
            T::GreaterGreaterEqual => Operator::AssignRShift,
            T::Equal => Operator::Assign,
            T::LeftParen => Operator::LeftParen,
            _ => return None,
        };
        Some(op)
    }

    /// Binding strength; lower binds tighter.
    pub fn precedence(self) -> u8 {
        use Operator::*;
        match self {
            Neg | BoolNot => 1,
            Places => 3,
            Power => 4,
            Multiply | Divide | Modulus => 5,
            Plus | Minus => 6,
            LShift | RShift => 7,
            AssignPower | AssignMultiply | AssignDivide | AssignModulus | AssignPlus
            | AssignMinus | AssignPlaces | AssignLShift | AssignRShift | Assign => 8,
            RelEq | RelLe | RelGe | RelNe | RelLt | RelGt => 9,
            BoolAnd => 10,
            BoolOr => 11,
            LeftParen => u8::MAX,
        }
    }

    /// Left-associative operators pop equal-precedence operators before
    /// being pushed; right-associative ones stack on top of them.
    pub fn is_left_assoc(self) -> bool {
        use Operator::*;
        !matches!(
            self,
            Neg | BoolNot
                | Places
                | Power
                | AssignPower
                | AssignMultiply
                | AssignDivide
                | AssignModulus
                | AssignPlus
                | AssignMinus
                | AssignPlaces
                | AssignLShift
                | AssignRShift
                | Assign
                | LeftParen
        )
    }

    /// Prefix operators take one operand.
    pub fn is_prefix(self) -> bool {
        matches!(self, Operator::Neg | Operator::BoolNot)
    }

    pub fn is_relational(self) -> bool {
        use Operator::*;
        matches!(self, RelEq | RelLe | RelGe | RelNe | RelLt | RelGt)
    }

    pub fn is_assignment(self) -> bool {
        self.precedence() == 8
    }

    /// The instruction emitted when the operator is popped.
    ///
    /// `None` for [`Operator::LeftParen`], which never reaches the code.
    pub fn opcode(self) -> Option<OpCode> {
        use Operator::*;
        let op = match self {
            Neg => OpCode::Neg,
            BoolNot => OpCode::BoolNot,
            Places => OpCode::Places,
            Power => OpCode::Power,
            Multiply => OpCode::Multiply,
            Divide => OpCode::Divide,
            Modulus => OpCode::Modulus,
            Plus => OpCode::Plus,
            Minus => OpCode::Minus,
            LShift => OpCode::LShift,
            RShift => OpCode::RShift,
            RelEq => OpCode::RelEq,
            RelLe => OpCode::RelLe,
            RelGe => OpCode::RelGe,
            RelNe => OpCode::RelNe,
            RelLt => OpCode::RelLt,
            RelGt => OpCode::RelGt,
            BoolAnd => OpCode::BoolAnd,
            BoolOr => OpCode::BoolOr,
            AssignPower => OpCode::AssignPower,
            AssignMultiply => OpCode::AssignMultiply,
            AssignDivide => OpCode::AssignDivide,
            AssignModulus => OpCode::AssignModulus,
            AssignPlus => OpCode::AssignPlus,
            AssignMinus => OpCode::AssignMinus,
            AssignPlaces => OpCode::AssignPlaces,
            AssignLShift => OpCode::AssignLShift,
            AssignRShift => OpCode::AssignRShift,
            Assign => OpCode::Assign,
            LeftParen => return None,
        };
        Some(op)
    }

    /// Whether `self`, sitting on the stack, is emitted before `incoming`
    /// is pushed.
    #[inline]
    pub fn pops_before(self, incoming: Operator) -> bool {
        if self == Operator::LeftParen {
            return false;
        }
        let (l, r) = (self.precedence(), incoming.precedence());
        l < r || (l == r && incoming.is_left_assoc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_mapping() {
        assert_eq!(Operator::from_token(TokenKind::Caret), Some(Operator::Power));
        assert_eq!(Operator::from_token(TokenKind::PlusEqual), Some(Operator::AssignPlus));
        assert_eq!(Operator::from_token(TokenKind::Minus), Some(Operator::Minus));
        assert_eq!(Operator::from_token(TokenKind::PlusPlus), None);
        assert_eq!(Operator::from_token(TokenKind::Dollar), None);
    }

    #[test]
    fn assignment_binds_tighter_than_comparison() {
        assert!(Operator::Assign.precedence() < Operator::RelLt.precedence());
        assert!(Operator::Plus.precedence() < Operator::Assign.precedence());
        assert!(Operator::BoolAnd.precedence() < Operator::BoolOr.precedence());
    }

    #[test]
    fn associativity_controls_equal_precedence_pops() {
        // 2-3-4: the first minus is emitted before the second is pushed
        assert!(Operator::Minus.pops_before(Operator::Minus));
        assert!(Operator::Plus.pops_before(Operator::Minus));
        // 2^3^2 and a=b=c stack up
        assert!(!Operator::Power.pops_before(Operator::Power));
        assert!(!Operator::Assign.pops_before(Operator::AssignPlus));
        // tighter operators always go first
        assert!(Operator::Multiply.pops_before(Operator::Plus));
        assert!(!Operator::Plus.pops_before(Operator::Multiply));
        assert!(Operator::Neg.pops_before(Operator::Power));
    }

    #[test]
    fn parens_are_barriers() {
        assert!(!Operator::LeftParen.pops_before(Operator::BoolOr));
        assert_eq!(Operator::LeftParen.opcode(), None);
    }

    #[test]
    fn classification() {
        assert!(Operator::Neg.is_prefix());
        assert!(Operator::BoolNot.is_prefix());
        assert!(!Operator::Minus.is_prefix());
        assert!(Operator::RelNe.is_relational());
        assert!(Operator::AssignRShift.is_assignment());
        assert!(!Operator::RelEq.is_assignment());
        assert_eq!(Operator::AssignPlaces.opcode(), Some(OpCode::AssignPlaces));
    }
}
