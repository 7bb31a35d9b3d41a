mod bytecode;

#[cfg(test)]
mod bytecode_tests;
