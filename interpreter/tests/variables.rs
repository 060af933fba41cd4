mod eloquence_test;
use eloquence_test::*;

eloquence_test!(assignment_binds_and_evaluates
"
x is 5
y is x
z is x adds y
"
  x == 5
  y == 5
  z == 10
);

eloquence_test!(reassignment_replaces_the_binding
"
x is 1
x is x adds 1
x is x times 10
"
  x == 20
);

eloquence_test!(assignment_can_change_type
"
x is 1
x is \"now a string\"
"
  x == "now a string"
);

eloquence_test!(if_branch_shadows_without_leaking
"
x is 1
touched is false
if true {
  x is 99
  touched is true
}
"
  x == 1
  touched == false
);

eloquence_test!(function_scope_shadows_without_leaking
"
x is 1
f is takes() {
  x is 99
  return x
}
inner is f()
"
  x == 1
  inner == 99
);

eloquence_test!(while_body_writes_the_enclosing_scope
"
n is 3
while n greater 0 {
  n is n minus 1
}
"
  n == 0
);

eloquence_test!(builtins_can_be_shadowed
"
show is 42
x is show
count is takes(a) { return 7 }
y is count([1, 2, 3])
"
  x == 42
  y == 7
);

eloquence_test!(identifier_not_found
  "x adds 1"
  RuntimeError "identifier not found: x"
);

eloquence_test!(assignment_rhs_error_leaves_name_unbound
  "x is 1 divides 0 x"
  RuntimeError "division by zero"
);
