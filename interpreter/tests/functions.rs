mod eloquence_test;
use eloquence_test::*;

eloquence_test!(identity_function
"
identity is takes(x) { x }
out is identity(5)
"
  out == 5
);

eloquence_test!(explicit_return_unwraps_at_the_call
"
double is takes(x) { return x times 2 }
out is double(21)
"
  out == 42
);

eloquence_test!(return_skips_the_rest_of_the_body
"
f is takes() {
  return 1
  return 2
}
out is f()
"
  out == 1
);

eloquence_test!(last_expression_is_the_implicit_result
"
add is takes(a, b) { a adds b }
out is add(3, 4)
"
  out == 7
);

eloquence_test!(closures_capture_their_definition_environment
"
newAdder is takes(x) {
  return takes(y) { x adds y }
}
addTwo is newAdder(2)
out is addTwo(2)
"
  out == 4
);

eloquence_test!(closures_keep_the_environment_alive
"
counterFactory is takes(start) {
  return takes() { start adds 1 }
}
next is counterFactory(10)
a is next()
b is next()
"
  a == 11
  b == 11
);

eloquence_test!(recursion
"
factorial is takes(n) {
  if n equals 0 {
    return 1
  }
  return n times factorial(n minus 1)
}
out is factorial(5)
"
  out == 120
);

eloquence_test!(functions_are_first_class_arguments
"
apply is takes(f, value) { return f(value) }
square is takes(n) { n times n }
out is apply(square, 6)
"
  out == 36
);

eloquence_test!(extra_arguments_are_discarded
"
first is takes(a) { a }
out is first(1, 2, 3)
"
  out == 1
);

eloquence_test!(missing_parameters_stay_unbound
"
f is takes(a, b) { a adds b }
f(1)
"
  RuntimeError "identifier not found: b"
);

eloquence_test!(calling_a_non_function
  "5(1)"
  RuntimeError "not a function: INTEGER"
);

eloquence_test!(argument_errors_propagate_before_the_call
"
f is takes(a) { a }
f(1 divides 0)
"
  RuntimeError "division by zero"
);

eloquence_test!(return_inside_while_exits_the_function
"
findFirst is takes(limit) {
  n is 0
  while true {
    if n greater_equal limit {
      return n
    }
    n is n adds 1
  }
}
out is findFirst(4)
"
  out == 4
);
