/// This macro helps defining the pipeline registers (latches) of a CPU.
///
/// During a CPU cycle,
/// 1. Signals in pipeline registers, which are the result of the previous
///    cycle, are provided for this cycle.
/// 2. Every stage reads the registers in front of it and computes the
///    values of the registers behind it.
/// 3. After all stages are done, the computed values become the starting
///    signals of the next cycle.
///
/// Each register is declared with a struct name, a short name and its fields.
/// The default value of every field is the value the register holds at
/// reset, so a register that does not carry an instruction yet holds the
/// bubble. All registers are collected into `PipeRegs`, whose fields are
/// named by the short names.
#[macro_export]
macro_rules! define_stages {
    ($(
        $(#[$att:meta])*
        $stage_name:ident $short_name:ident {
            $( $(#[$field_att:meta])* $fname:ident : $ftype:ty = $fdefault:expr ),* $(,)?
        }
    )*) => {
        $(
        $(#[$att])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub struct $stage_name {
            $( $(#[$field_att])* pub $fname: $ftype, )*
        }
        impl Default for $stage_name {
            fn default() -> Self {
                Self { $( $fname: $fdefault, )* }
            }
        }
        )*

        /// All pipeline registers (all stages).
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub struct PipeRegs {
            $( pub $short_name: $stage_name, )*
        }
    };
}
