//! Bytecode operation codes.
//!
//! This module defines the instruction set the bc virtual machine executes.
//! Each opcode is a single byte; a few carry variable-length index operands
//! (see [`BytecodeChunk`](super::BytecodeChunk)).

use num_enum::TryFromPrimitive;

/// Bytecode operation codes.
///
/// The VM is a stack-based machine. Operators pop their operands and push
/// the result. Assignments expect the target reference below the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Operators
    // =========================================================================
    /// Postfix increment of the reference on top of the stack.
    Inc = 0,
    /// Postfix decrement of the reference on top of the stack.
    Dec,
    /// Unary minus.
    Neg,
    /// Boolean not.
    BoolNot,
    /// Truncate to integer (`$`).
    Trunc,
    Power,
    Multiply,
    Divide,
    Modulus,
    Plus,
    Minus,
    /// Set the number of decimal places (`@`).
    Places,
    LShift,
    RShift,

    // =========================================================================
    // Relational and boolean
    // =========================================================================
    RelEq,
    RelLe,
    RelGe,
    RelNe,
    RelLt,
    RelGt,
    BoolOr,
    BoolAnd,

    // =========================================================================
    // Assignment (leaves the assigned value on the stack)
    // =========================================================================
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

    // =========================================================================
    // Assignment without a result value
    // =========================================================================
    AssignPowerNoVal,
    AssignMultiplyNoVal,
    AssignDivideNoVal,
    AssignModulusNoVal,
    AssignPlusNoVal,
    AssignMinusNoVal,
    AssignPlacesNoVal,
    AssignLShiftNoVal,
    AssignRShiftNoVal,
    AssignNoVal,

    // =========================================================================
    // Operands
    // =========================================================================
    /// Push a number constant.
    /// Operand: constant index
    Num,
    /// Push a string constant.
    /// Operand: constant index
    Str,
    /// Push a variable reference.
    /// Operand: variable index
    Var,
    /// Push an array element reference; the element index is on the stack.
    /// Operand: array index
    ArrayElem,
    /// Push a whole array (function arguments only).
    /// Operand: array index
    Array,
    Zero,
    One,
    Last,
    Ibase,
    Obase,
    Scale,
    Seed,

    // =========================================================================
    // Builtins
    // =========================================================================
    Length,
    /// `scale(expr)`, as opposed to the `scale` variable.
    ScaleFunc,
    Sqrt,
    Abs,
    Irand,
    Asciify,
    Read,
    Rand,
    MaxIbase,
    MaxObase,
    MaxScale,
    MaxRand,
    LineLength,
    GlobalStacks,
    LeadingZero,
    Modexp,
    /// Pushes the quotient and the remainder.
    Divmod,

    // =========================================================================
    // Functions
    // =========================================================================
    /// Call a function.
    /// Operands: argument count, function id
    Call,
    /// Return the value on top of the stack.
    Ret,
    /// Return zero.
    Ret0,
    /// Return from a void function.
    RetVoid,

    // =========================================================================
    // Output
    // =========================================================================
    /// Print the value with a newline and store it in `last`.
    Print,
    /// Print and pop without a newline.
    PrintPop,
    /// Print the string on top of the stack, processing escapes.
    PrintStr,
    /// Write the value to the output stream as raw bytes.
    PrintStream,

    // =========================================================================
    // Control flow and stack
    // =========================================================================
    /// Operand: label index
    Jump,
    /// Pop and jump when zero.
    /// Operand: label index
    JumpZero,
    Pop,
    Swap,
    Halt,
}

impl OpCode {
    /// Number of index operands following the opcode byte.
    pub fn operand_count(&self) -> usize {
        match self {
            OpCode::Call => 2,
            OpCode::Num
            | OpCode::Str
            | OpCode::Var
            | OpCode::ArrayElem
            | OpCode::Array
            | OpCode::Jump
            | OpCode::JumpZero => 1,
            _ => 0,
        }
    }

    /// Decode an opcode byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Assignments that leave their value on the stack.
    pub fn is_assignment(&self) -> bool {
        (OpCode::AssignPower as u8..=OpCode::Assign as u8).contains(&(*self as u8))
    }

    /// Assignments that discard their value.
    pub fn is_no_val(&self) -> bool {
        (OpCode::AssignPowerNoVal as u8..=OpCode::AssignNoVal as u8).contains(&(*self as u8))
    }

    /// The discarding form of a value-producing assignment.
    pub fn no_val(&self) -> Option<OpCode> {
        if !self.is_assignment() {
            return None;
        }
        let distance = OpCode::AssignPowerNoVal as u8 - OpCode::AssignPower as u8;
        OpCode::from_u8(*self as u8 + distance)
    }

    /// Get the opcode name for debugging/display.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Inc => "INC",
            OpCode::Dec => "DEC",
            OpCode::Neg => "NEG",
            OpCode::BoolNot => "BOOL_NOT",
            OpCode::Trunc => "TRUNC",
            OpCode::Power => "POWER",
            OpCode::Multiply => "MULTIPLY",
            OpCode::Divide => "DIVIDE",
            OpCode::Modulus => "MODULUS",
            OpCode::Plus => "PLUS",
            OpCode::Minus => "MINUS",
            OpCode::Places => "PLACES",
            OpCode::LShift => "LSHIFT",
            OpCode::RShift => "RSHIFT",
            OpCode::RelEq => "REL_EQ",
            OpCode::RelLe => "REL_LE",
            OpCode::RelGe => "REL_GE",
            OpCode::RelNe => "REL_NE",
            OpCode::RelLt => "REL_LT",
            OpCode::RelGt => "REL_GT",
            OpCode::BoolOr => "BOOL_OR",
            OpCode::BoolAnd => "BOOL_AND",
            OpCode::AssignPower => "ASSIGN_POWER",
            OpCode::AssignMultiply => "ASSIGN_MULTIPLY",
            OpCode::AssignDivide => "ASSIGN_DIVIDE",
            OpCode::AssignModulus => "ASSIGN_MODULUS",
            OpCode::AssignPlus => "ASSIGN_PLUS",
            OpCode::AssignMinus => "ASSIGN_MINUS",
            OpCode::AssignPlaces => "ASSIGN_PLACES",
            OpCode::AssignLShift => "ASSIGN_LSHIFT",
            OpCode::AssignRShift => "ASSIGN_RSHIFT",
            OpCode::Assign => "ASSIGN",
            OpCode::AssignPowerNoVal => "ASSIGN_POWER_NO_VAL",
            OpCode::AssignMultiplyNoVal => "ASSIGN_MULTIPLY_NO_VAL",
            OpCode::AssignDivideNoVal => "ASSIGN_DIVIDE_NO_VAL",
            OpCode::AssignModulusNoVal => "ASSIGN_MODULUS_NO_VAL",
            OpCode::AssignPlusNoVal => "ASSIGN_PLUS_NO_VAL",
            OpCode::AssignMinusNoVal => "ASSIGN_MINUS_NO_VAL",
            OpCode::AssignPlacesNoVal => "ASSIGN_PLACES_NO_VAL",
            OpCode::AssignLShiftNoVal => "ASSIGN_LSHIFT_NO_VAL",
            OpCode::AssignRShiftNoVal => "ASSIGN_RSHIFT_NO_VAL",
            OpCode::AssignNoVal => "ASSIGN_NO_VAL",
            OpCode::Num => "NUM",
            OpCode::Str => "STR",
            OpCode::Var => "VAR",
            OpCode::ArrayElem => "ARRAY_ELEM",
            OpCode::Array => "ARRAY",
            OpCode::Zero => "ZERO",
            OpCode::One => "ONE",
            OpCode::Last => "LAST",
            OpCode::Ibase => "IBASE",
            OpCode::Obase => "OBASE",
            OpCode::Scale => "SCALE",
            OpCode::Seed => "SEED",
            OpCode::Length => "LENGTH",
            OpCode::ScaleFunc => "SCALE_FUNC",
            OpCode::Sqrt => "SQRT",
            OpCode::Abs => "ABS",
            OpCode::Irand => "IRAND",
            OpCode::Asciify => "ASCIIFY",
            OpCode::Read => "READ",
            OpCode::Rand => "RAND",
            OpCode::MaxIbase => "MAXIBASE",
            OpCode::MaxObase => "MAXOBASE",
            OpCode::MaxScale => "MAXSCALE",
            OpCode::MaxRand => "MAXRAND",
            OpCode::LineLength => "LINE_LENGTH",
            OpCode::GlobalStacks => "GLOBAL_STACKS",
            OpCode::LeadingZero => "LEADING_ZERO",
            OpCode::Modexp => "MODEXP",
            OpCode::Divmod => "DIVMOD",
            OpCode::Call => "CALL",
            OpCode::Ret => "RET",
            OpCode::Ret0 => "RET0",
            OpCode::RetVoid => "RET_VOID",
            OpCode::Print => "PRINT",
            OpCode::PrintPop => "PRINT_POP",
            OpCode::PrintStr => "PRINT_STR",
            OpCode::PrintStream => "PRINT_STREAM",
            OpCode::Jump => "JUMP",
            OpCode::JumpZero => "JUMP_ZERO",
            OpCode::Pop => "POP",
            OpCode::Swap => "SWAP",
            OpCode::Halt => "HALT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_repr() {
        assert_eq!(OpCode::Inc as u8, 0);
        assert_eq!(OpCode::Dec as u8, 1);
    }

    #[test]
    fn opcode_from_u8() {
        assert_eq!(OpCode::from_u8(0), Some(OpCode::Inc));
        assert_eq!(OpCode::from_u8(OpCode::Halt as u8), Some(OpCode::Halt));
        assert_eq!(OpCode::from_u8(OpCode::Halt as u8 + 1), None);
        assert_eq!(OpCode::from_u8(255), None);
    }

    #[test]
    fn opcode_name() {
        assert_eq!(OpCode::JumpZero.name(), "JUMP_ZERO");
        assert_eq!(OpCode::AssignPlusNoVal.name(), "ASSIGN_PLUS_NO_VAL");
        assert_eq!(OpCode::Ret0.name(), "RET0");
    }

    #[test]
    fn operand_counts() {
        assert_eq!(OpCode::Plus.operand_count(), 0);
        assert_eq!(OpCode::Ret.operand_count(), 0);
        assert_eq!(OpCode::Num.operand_count(), 1);
        assert_eq!(OpCode::JumpZero.operand_count(), 1);
        assert_eq!(OpCode::Call.operand_count(), 2);
    }

    #[test]
    fn no_val_counterparts() {
        let pairs = [
            (OpCode::AssignPower, OpCode::AssignPowerNoVal),
            (OpCode::AssignMultiply, OpCode::AssignMultiplyNoVal),
            (OpCode::AssignDivide, OpCode::AssignDivideNoVal),
            (OpCode::AssignModulus, OpCode::AssignModulusNoVal),
            (OpCode::AssignPlus, OpCode::AssignPlusNoVal),
            (OpCode::AssignMinus, OpCode::AssignMinusNoVal),
            (OpCode::AssignPlaces, OpCode::AssignPlacesNoVal),
            (OpCode::AssignLShift, OpCode::AssignLShiftNoVal),
            (OpCode::AssignRShift, OpCode::AssignRShiftNoVal),
            (OpCode::Assign, OpCode::AssignNoVal),
        ];
        for (op, no_val) in pairs {
            assert!(op.is_assignment());
            assert!(no_val.is_no_val());
            assert_eq!(op.no_val(), Some(no_val));
        }
        assert_eq!(OpCode::Plus.no_val(), None);
        assert_eq!(OpCode::AssignNoVal.no_val(), None);
    }
}
