mod eloquence_test;
use eloquence_test::*;

eloquence_test!(integer_arithmetic
"
a is 5 adds 5 adds 5 adds 5 minus 10
b is 2 times 2 times 2 times 2 times 2
c is -50 adds 100 adds -50
d is 5 times 2 adds 10
e is 5 adds 2 times 10
f is (5 adds 10 times 2 adds 15 divides 3) times 2 adds -10
"
  a == 10
  b == 32
  c == 0
  d == 20
  e == 25
  f == 50
);

eloquence_test!(subtraction_spellings
"
a is 10 subtracts 3
b is 10 minus 3
"
  a == 7
  b == 7
);

eloquence_test!(integer_division_and_modulo
"
a is 7 divides 2
b is 7 modulo 2
c is 9 modulo 3
"
  a == 3
  b == 1
  c == 0
);

eloquence_test!(integer_comparisons
"
a is 1 less 2
b is 1 greater 2
c is 1 less 1
d is 2 greater_equal 2
e is 1 less_equal 0
f is 1 equals 1
g is 1 not_equals 2
"
  a == true
  b == false
  c == false
  d == true
  e == false
  f == true
  g == true
);

eloquence_test!(float_arithmetic
"
a is 1.5 adds 2.25
b is 2.5 times 4.0
c is 1.0 divides 4.0
d is 3.5 minus 0.5
e is 2.5 greater 2.4
"
  a == 3.75
  b == 10.0
  c == 0.25
  d == 3.0
  e == true
);

eloquence_test!(float_division_by_zero_is_ieee
"
inf is 1.0 divides 0.0
big is inf greater 1000000.0
"
  big == true
);

eloquence_test!(string_operators
"
greeting is \"Hello\" adds \" \" adds \"World\"
same is \"abc\" equals \"abc\"
different is \"abc\" not_equals \"abd\"
"
  greeting == "Hello World"
  same == true
  different == true
);

eloquence_test!(boolean_operators
"
a is true and true
b is true and false
c is false or true
d is false or false
e is true equals true
f is true not_equals false
"
  a == true
  b == false
  c == true
  d == false
  e == true
  f == true
);

eloquence_test!(prefix_operators
"
a is -5
b is minus 5
c is -10.5
d is not true
e is !true
f is not false
g is !5
h is not none
"
  a == -5
  b == -5
  c == -10.5
  d == false
  e == false
  f == true
  g == false
  h == true
);

eloquence_test!(null_comparisons_cross_type
"
a is none equals 5
b is none not_equals 5
c is \"x\" equals none
d is none equals none
e is none not_equals none
"
  a == false
  b == true
  c == false
  d == true
  e == false
);

eloquence_test!(division_by_zero
  "10 divides 0"
  RuntimeError "division by zero"
);

eloquence_test!(modulo_by_zero
  "10 modulo 0"
  RuntimeError "division by zero"
);

eloquence_test!(type_mismatch_integer_boolean
  "5 adds true"
  RuntimeError "type mismatch: INTEGER adds BOOLEAN"
);

eloquence_test!(type_mismatch_integer_float
  "5 adds 2.5"
  RuntimeError "type mismatch: INTEGER adds FLOAT"
);

eloquence_test!(unknown_operator_strings
  "\"a\" times \"b\""
  RuntimeError "unknown operator: STRING times STRING"
);

eloquence_test!(unknown_operator_booleans
  "true adds false"
  RuntimeError "unknown operator: BOOLEAN adds BOOLEAN"
);

eloquence_test!(unknown_operator_prefix_minus
  "-true"
  RuntimeError "unknown operator: -BOOLEAN"
);

eloquence_test!(float_has_no_modulo
  "5.0 modulo 2.0"
  RuntimeError "unknown operator: FLOAT modulo FLOAT"
);

eloquence_test!(error_short_circuits_compound_expressions
  "5 adds (10 divides 0) adds 100"
  RuntimeError "division by zero"
);
