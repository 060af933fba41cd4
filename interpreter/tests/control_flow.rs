mod eloquence_test;
use eloquence_test::*;

eloquence_test!(if_expression_yields_branch_value
"
a is if true { 10 }
b is if false { 10 }
c is if 1 less 2 { \"yes\" } else { \"no\" }
d is if 1 greater 2 { \"yes\" } else { \"no\" }
"
  a == 10
  c == "yes"
  d == "no"
);

eloquence_test!(if_without_alternative_yields_none
"
missing is if false { 10 }
ok is missing equals none
"
  ok == true
);

eloquence_test!(else_if_chains
"
grade is takes(score) {
  if score greater_equal 90 {
    return \"A\"
  } else if score greater_equal 80 {
    return \"B\"
  } else {
    return \"C\"
  }
}
a is grade(95)
b is grade(85)
c is grade(20)
"
  a == "A"
  b == "B"
  c == "C"
);

eloquence_test!(only_none_and_false_are_falsy
"
a is if 0 { 1 } else { 2 }
b is if \"\" { 1 } else { 2 }
c is if [] { 1 } else { 2 }
d is if none { 1 } else { 2 }
e is if false { 1 } else { 2 }
"
  a == 1
  b == 1
  c == 1
  d == 2
  e == 2
);

eloquence_test!(while_loop_counts
"
total is 0
n is 1
while n less_equal 5 {
  total is total adds n
  n is n adds 1
}
"
  total == 15
  n == 6
);

eloquence_test!(repeat_loops_like_while
"
n is 0
repeat n less 3 {
  n is n adds 1
}
"
  n == 3
);

eloquence_test!(while_condition_error_propagates
"
while 1 divides 0 { 1 }
"
  RuntimeError "division by zero"
);

eloquence_test!(for_in_iterates_an_array
"
total is 0
for item in [1, 2, 3, 4] {
  total is total adds item
}
"
  total == 10
  item == 4
);

eloquence_test!(for_in_over_empty_array_skips_the_body
"
ran is false
for item in [] {
  ran is true
}
"
  ran == false
);

eloquence_test!(for_in_requires_an_array
"
for item in 5 { item }
"
  RuntimeError "for-in expects ARRAY, got INTEGER"
);

eloquence_test!(try_catch_replaces_the_error
"
out is 0
try {
  out is 1
  1 divides 0
  out is 2
} catch {
  recovered is true
}
"
  out == 0
);

eloquence_test!(try_without_error_keeps_the_result
"
status is \"pending\"
p is pointing to status
try {
  pointing from p is \"done\"
}
"
  status == "done"
);

eloquence_test!(try_without_catch_swallows_the_error
"
before is 1
try {
  1 divides 0
}
after is 2
"
  before == 1
  after == 2
);

eloquence_test!(finally_runs_after_success
"
log is 0
p is pointing to log
try {
  1 adds 1
} finally {
  pointing from p is 1
}
"
  log == 1
);

eloquence_test!(finally_runs_after_a_caught_error
"
log is 0
p is pointing to log
try {
  1 divides 0
} catch {
  0
} finally {
  pointing from p is 2
}
"
  log == 2
);

eloquence_test!(finally_runs_after_a_swallowed_error
"
log is 0
p is pointing to log
try {
  1 divides 0
} finally {
  pointing from p is 3
}
"
  log == 3
);

eloquence_test!(finally_errors_are_discarded
"
out is 1
try {
  out is 2
} finally {
  1 divides 0
}
after is 5
"
  after == 5
);

eloquence_test!(catch_errors_still_propagate
"
try {
  1 divides 0
} catch {
  2 divides 0
}
"
  RuntimeError "division by zero"
);

eloquence_test!(errors_terminate_the_program
"
x is 1
1 divides 0
x is 2
"
  RuntimeError "division by zero"
);
