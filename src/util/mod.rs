use crate::optimizer::PlanNode;

pub fn pretty_plan_tree_string(plan: &dyn PlanNode) -> String {
    let mut explain_result = String::new();
    plan.explain(0, &mut explain_result);
    explain_result
}

pub fn pretty_plan_tree(plan: &dyn PlanNode) {
    println!("{}", pretty_plan_tree_string(plan));
}
